// --------------------------------------------------------------------------------
// Longest descending trail per vertex
// --------------------------------------------------------------------------------

use crate::dag::{
    DescentGraph,
    VertexIdx,
};
use crate::errors::{
    Result,
    TrailError,
};
use crate::grid::{
    CellId,
    Elevation,
};
use indicatif::{
    ParallelProgressIterator,
    ProgressBar,
    ProgressIterator,
    ProgressStyle,
};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{
    debug,
    instrument,
};

/// Below this many sources the progress bar is not worth drawing.
const PROGRESS_MIN_SOURCES: usize = 10_000;

/// One cell of a trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrailStep {
    pub id: CellId,
    pub value: Elevation,
}

/// A strictly descending sequence of adjacent cells. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trail {
    steps: Vec<TrailStep>,
}

impl Trail {
    pub fn steps(&self) -> &[TrailStep] {
        &self.steps
    }

    /// Number of cells in the trail.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn first(&self) -> &TrailStep {
        &self.steps[0]
    }

    pub fn last(&self) -> &TrailStep {
        &self.steps[self.steps.len() - 1]
    }

    /// Elevation difference between the first and last cell.
    pub fn elevation_drop(&self) -> u64 {
        self.first().value.abs_diff(self.last().value)
    }
}

/// Memoized result for a single vertex: the best trail starting there is
/// this vertex followed by the best trail of `next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestStep {
    /// Number of cells in the best trail starting at this vertex.
    pub len: usize,
    /// Last vertex of that trail.
    pub tail: VertexIdx,
    /// Chosen child, `None` for sinks.
    pub next: Option<VertexIdx>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Materialize source trails on the rayon pool.
    pub parallel: bool,
    /// Draw a progress bar while materializing source trails.
    pub show_progress: bool,
}

/// Best descending trail for every vertex of a [`DescentGraph`].
///
/// The table is filled once, in reverse topological order, so every child is
/// resolved before any of its parents and each vertex is visited exactly
/// once. After construction the resolver is read-only and can be shared
/// across threads.
pub struct DescentResolver<'g> {
    graph: &'g DescentGraph,
    table: Vec<BestStep>,
}

impl<'g> DescentResolver<'g> {
    #[instrument(level = "debug", skip_all, fields(vertices = graph.num_vertices()))]
    pub fn new(graph: &'g DescentGraph) -> Result<Self> {
        let order = graph.topological_order()?;
        let mut table: Vec<Option<BestStep>> = vec![None; graph.num_vertices()];

        for &v in order.iter().rev() {
            let step = resolve_vertex(graph, &table, v)?;
            table[v] = Some(step);
        }

        let table = table
            .into_iter()
            .enumerate()
            .map(|(v, step)| {
                step.ok_or_else(|| {
                    TrailError::invariant(format!(
                        "vertex {} was never resolved",
                        graph.vertex(v).id
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Resolved {} vertices", table.len());
        Ok(Self { graph, table })
    }

    pub fn graph(&self) -> &'g DescentGraph {
        self.graph
    }

    pub fn best_step(&self, v: VertexIdx) -> &BestStep {
        &self.table[v]
    }

    /// Walks the memoized choices starting at `v`.
    pub fn best_trail(&self, v: VertexIdx) -> Trail {
        let mut steps = Vec::with_capacity(self.table[v].len);
        let mut current = Some(v);
        while let Some(idx) = current {
            let vertex = self.graph.vertex(idx);
            steps.push(TrailStep {
                id: vertex.id,
                value: vertex.value,
            });
            current = self.table[idx].next;
        }
        Trail { steps }
    }

    /// Best trail of every source vertex, in row-major source order.
    ///
    /// The parallel path collects in order, so both modes return the same
    /// sequence.
    #[instrument(level = "debug", skip_all, fields(parallel = options.parallel))]
    pub fn source_trails(&self, options: &ResolveOptions) -> Vec<Trail> {
        let sources: Vec<VertexIdx> = self.graph.sources().collect();
        let progress = if options.show_progress && sources.len() >= PROGRESS_MIN_SOURCES {
            let pb = ProgressBar::new(sources.len() as u64);
            if let Ok(style) = ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
            ) {
                pb.set_style(style);
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        let trails: Vec<Trail> = if options.parallel {
            sources
                .par_iter()
                .progress_with(progress.clone())
                .map(|&s| self.best_trail(s))
                .collect()
        } else {
            sources
                .iter()
                .progress_with(progress.clone())
                .map(|&s| self.best_trail(s))
                .collect()
        };
        progress.finish_and_clear();
        trails
    }
}

/// Picks the best continuation for `v` from its already resolved children.
///
/// A child replaces the current pick only if it is strictly better: longer,
/// or as long with a larger drop from `v`. Equal candidates therefore keep
/// the first one in edge (scan) order.
fn resolve_vertex(
    graph: &DescentGraph,
    table: &[Option<BestStep>],
    v: VertexIdx,
) -> Result<BestStep> {
    let value = graph.vertex(v).value;
    let mut best = BestStep {
        len: 1,
        tail: v,
        next: None,
    };
    let mut best_drop = 0u64;

    for child in graph.children(v) {
        let Some(child_step) = table[child] else {
            return Err(TrailError::invariant(format!(
                "child {} of {} resolved after its parent",
                graph.vertex(child).id,
                graph.vertex(v).id
            )));
        };
        let tail_value = graph.vertex(child_step.tail).value;
        if tail_value >= value {
            return Err(TrailError::invariant(format!(
                "trail from {} does not descend (ends at {})",
                graph.vertex(v).id,
                graph.vertex(child_step.tail).id
            )));
        }

        let len = child_step.len + 1;
        let drop = value.abs_diff(tail_value);
        if len > best.len || (len == best.len && drop > best_drop) {
            best = BestStep {
                len,
                tail: child_step.tail,
                next: Some(child),
            };
            best_drop = drop;
        }
    }

    Ok(best)
}
