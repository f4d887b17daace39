//! Descent graph derived from an elevation grid.
//!
//! Every cell becomes a vertex. A directed edge goes from a cell to each
//! 4-adjacent neighbor with a strictly lower elevation, so following edges
//! always strictly decreases the elevation and the graph is acyclic.
//!
//! A cell is a *source* when none of its existing neighbors is at least as
//! high as itself. Note that two equal neighbors are both non-sources while
//! no edge joins them; isolated plateaus therefore contribute no trails.

use crate::errors::{
    Result,
    TrailError,
};
use crate::grid::{
    CellId,
    Elevation,
    ElevationGrid,
};
use std::collections::VecDeque;
use std::ops::Range;
use tracing::{
    debug,
    instrument,
};

/// Index of a vertex in [`DescentGraph::vertices`]. Row-major over the grid.
pub type VertexIdx = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
    pub id: CellId,
    pub value: Elevation,
    pub is_source: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: VertexIdx,
    pub to: VertexIdx,
}

/// Immutable, index-based descent graph.
///
/// Outgoing edges are stored contiguously per vertex: the edges leaving
/// vertex `v` are `edges[edge_offsets[v]..edge_offsets[v + 1]]`, in the
/// grid's neighbor scan order (north, east, west, south).
#[derive(Debug, Clone)]
pub struct DescentGraph {
    cols: usize,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    edge_offsets: Vec<usize>,
}

impl DescentGraph {
    /// Builds the graph from a validated grid.
    #[instrument(level = "debug", skip_all, fields(rows = grid.rows(), cols = grid.cols()))]
    pub fn from_grid(grid: &ElevationGrid) -> Self {
        let mut vertices = Vec::with_capacity(grid.len());
        let mut edges = Vec::new();
        let mut edge_offsets = Vec::with_capacity(grid.len() + 1);
        edge_offsets.push(0);

        for (cell, value) in grid.iter_cells() {
            let from = grid.index_of(cell);
            let mut is_source = true;
            for (neighbor, neighbor_value) in grid.neighbors(cell) {
                if neighbor_value < value {
                    edges.push(Edge {
                        from,
                        to: grid.index_of(neighbor),
                    });
                } else {
                    is_source = false;
                }
            }
            vertices.push(Vertex {
                id: cell,
                value,
                is_source,
            });
            edge_offsets.push(edges.len());
        }

        debug!(
            "Built descent graph with {} vertices and {} edges",
            vertices.len(),
            edges.len()
        );

        Self {
            cols: grid.cols(),
            vertices,
            edges,
            edge_offsets,
        }
    }

    /// Assembles a graph from arbitrary parts, without the guarantees
    /// `from_grid` provides. Used to exercise the invariant checks.
    #[cfg(test)]
    pub(crate) fn from_raw_parts(cols: usize, vertices: Vec<Vertex>, mut edges: Vec<Edge>) -> Self {
        edges.sort_by_key(|e| e.from);
        let mut edge_offsets = vec![0; vertices.len() + 1];
        for e in edges.iter() {
            edge_offsets[e.from + 1] += 1;
        }
        for i in 0..vertices.len() {
            edge_offsets[i + 1] += edge_offsets[i];
        }
        Self {
            cols,
            vertices,
            edges,
            edge_offsets,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex(&self, idx: VertexIdx) -> &Vertex {
        &self.vertices[idx]
    }

    /// O(1) lookup of a vertex index from its cell id.
    pub fn index_of(&self, id: CellId) -> Option<VertexIdx> {
        if id.col >= self.cols {
            return None;
        }
        let idx = id.row.checked_mul(self.cols)?.checked_add(id.col)?;
        (idx < self.vertices.len()).then_some(idx)
    }

    pub fn vertex_by_id(&self, id: CellId) -> Option<&Vertex> {
        self.index_of(id).map(|idx| &self.vertices[idx])
    }

    /// Indices into [`Self::edges`] of the edges leaving `idx`.
    pub fn outgoing_edges(&self, idx: VertexIdx) -> Range<usize> {
        self.edge_offsets[idx]..self.edge_offsets[idx + 1]
    }

    /// Direct descendants of `idx`, in scan order.
    pub fn children(&self, idx: VertexIdx) -> impl Iterator<Item = VertexIdx> + '_ {
        self.edges[self.outgoing_edges(idx)].iter().map(|e| e.to)
    }

    pub fn has_edge(&self, from: VertexIdx, to: VertexIdx) -> bool {
        self.children(from).any(|c| c == to)
    }

    /// Source vertices in row-major order.
    pub fn sources(&self) -> impl Iterator<Item = VertexIdx> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_source)
            .map(|(i, _)| i)
    }

    pub fn num_sources(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_source).count()
    }

    /// Kahn's topological sort over the edge set.
    ///
    /// Ties are released in ascending vertex index, so the order is
    /// deterministic. Returns an [`TrailError::InvariantViolation`] when some
    /// vertices can never be released, i.e. they lie on or behind a cycle.
    pub fn topological_order(&self) -> Result<Vec<VertexIdx>> {
        let n = self.vertices.len();
        let mut in_degree = vec![0usize; n];
        for e in self.edges.iter() {
            in_degree[e.to] += 1;
        }

        let mut queue: VecDeque<VertexIdx> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for child in self.children(v) {
                in_degree[child] -= 1;
                if in_degree[child] == 0 {
                    queue.push_back(child);
                }
            }
        }

        if order.len() != n {
            return Err(TrailError::invariant(format!(
                "descent graph has a cycle: {} of {} vertices could not be ordered",
                n - order.len(),
                n
            )));
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_of(rows: Vec<Vec<Elevation>>) -> DescentGraph {
        let grid = ElevationGrid::new(rows.len(), rows[0].len(), rows).unwrap();
        DescentGraph::from_grid(&grid)
    }

    #[test]
    fn test_single_cell_is_source_without_edges() {
        let g = graph_of(vec![vec![5]]);
        assert_eq!(g.num_vertices(), 1);
        assert_eq!(g.num_edges(), 0);
        assert!(g.vertex(0).is_source);
    }

    #[test]
    fn test_descending_row() {
        let g = graph_of(vec![vec![9, 5, 1]]);
        assert_eq!(g.sources().collect::<Vec<_>>(), vec![0]);
        assert_eq!(g.edges(), &[Edge { from: 0, to: 1 }, Edge { from: 1, to: 2 }]);
    }

    #[test]
    fn test_edges_follow_scan_order() {
        //   0 1 2
        // 0 1 2 1
        // 1 3 9 4
        // 2 1 0 1
        let g = graph_of(vec![vec![1, 2, 1], vec![3, 9, 4], vec![1, 0, 1]]);
        let center = g.index_of(CellId::new(1, 1)).unwrap();
        let children: Vec<_> = g.children(center).map(|c| g.vertex(c).id).collect();
        assert_eq!(
            children,
            vec![
                CellId::new(0, 1),
                CellId::new(1, 2),
                CellId::new(1, 0),
                CellId::new(2, 1),
            ]
        );
        assert!(g.vertex(center).is_source);
        assert_eq!(g.num_sources(), 1);
    }

    #[test]
    fn test_plateau_has_no_sources_and_no_edges() {
        let g = graph_of(vec![vec![5, 5]]);
        assert_eq!(g.num_sources(), 0);
        assert_eq!(g.num_edges(), 0);
    }

    #[test]
    fn test_plateau_marks_non_source_without_incoming_edge() {
        // Both 7s only see lower cells plus each other.
        let g = graph_of(vec![vec![7, 7], vec![1, 1]]);
        assert_eq!(g.num_sources(), 0);
        let top_left = g.index_of(CellId::new(0, 0)).unwrap();
        assert!(g.edges().iter().all(|e| e.to != top_left));
        assert_eq!(g.num_edges(), 2);
    }

    #[test]
    fn test_index_lookup() {
        let g = graph_of(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(g.index_of(CellId::new(1, 2)), Some(5));
        assert_eq!(g.vertex_by_id(CellId::new(1, 0)).map(|v| v.value), Some(4));
        assert_eq!(g.index_of(CellId::new(2, 0)), None);
        assert_eq!(g.index_of(CellId::new(0, 3)), None);
        assert_eq!(g.index_of(CellId::new(usize::MAX, 0)), None);
        assert_eq!(g.index_of(CellId::new(usize::MAX / 3 + 1, 2)), None);
    }

    #[test]
    fn test_topological_order_respects_edges() {
        let g = graph_of(vec![vec![4, 3, 8], vec![3, 2, 7], vec![6, 9, 1]]);
        let order = g.topological_order().unwrap();
        let mut position = vec![0; order.len()];
        for (pos, v) in order.iter().enumerate() {
            position[*v] = pos;
        }
        for e in g.edges() {
            assert!(position[e.from] < position[e.to]);
        }
    }

    #[test]
    fn test_topological_order_detects_cycle() {
        let vertices = vec![
            Vertex {
                id: CellId::new(0, 0),
                value: 1,
                is_source: false,
            },
            Vertex {
                id: CellId::new(0, 1),
                value: 1,
                is_source: false,
            },
        ];
        let edges = vec![Edge { from: 0, to: 1 }, Edge { from: 1, to: 0 }];
        let g = DescentGraph::from_raw_parts(2, vertices, edges);
        let err = g.topological_order().unwrap_err();
        assert!(matches!(err, TrailError::InvariantViolation { .. }));
    }
}
