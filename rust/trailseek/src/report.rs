use crate::resolver::Trail;
use crate::selector::Selection;
use serde::Serialize;
use std::fmt::Display;

/// Everything a run produces, ready to be rendered or serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrailReport {
    pub total_vertices: usize,
    pub source_vertices: usize,
    pub total_edges: usize,
    pub max_length: usize,
    pub max_drop: u64,
    pub path_count: usize,
    pub paths: Vec<Trail>,
}

impl TrailReport {
    pub fn new(
        total_vertices: usize,
        source_vertices: usize,
        total_edges: usize,
        selection: Selection,
    ) -> Self {
        Self {
            total_vertices,
            source_vertices,
            total_edges,
            max_length: selection.max_length,
            max_drop: selection.max_drop,
            path_count: selection.trails.len(),
            paths: selection.trails,
        }
    }

    /// Header lines with the graph statistics.
    pub fn summary_lines(&self) -> [String; 2] {
        [
            format!(
                "vertices -> (sources/total): ({}/{})",
                self.source_vertices, self.total_vertices
            ),
            format!("edges -> total {}", self.total_edges),
        ]
    }

    pub fn results_line(&self) -> String {
        format!(
            "No. of paths with the longest length ({}) and depth ({}): {}",
            self.max_length, self.max_drop, self.path_count
        )
    }
}

impl Display for Trail {
    /// `[r0_c0(9)]-[r0_c1(5)]-[r0_c2(1)]`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, step) in self.steps().iter().enumerate() {
            if i > 0 {
                write!(f, "-")?;
            }
            write!(f, "[{}({})]", step.id, step.value)?;
        }
        Ok(())
    }
}
