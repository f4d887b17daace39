//! Steepest longest descending trails on an elevation grid.
//!
//! The pipeline has three stages:
//! 1. [`DescentGraph::from_grid`] turns the grid into a DAG whose edges go
//!    from each cell to its strictly lower 4-neighbors.
//! 2. [`DescentResolver`] computes, once per vertex, the longest descending
//!    trail starting there (ties broken by larger drop, then scan order).
//! 3. [`select_trails`] keeps the longest source trails and, among those,
//!    the ones with the largest drop.

pub mod dag;
pub mod errors;
pub mod grid;
pub mod report;
pub mod resolver;
pub mod selector;

pub use dag::{
    DescentGraph,
    Edge,
    Vertex,
    VertexIdx,
};
pub use errors::{
    Result,
    TrailError,
};
pub use grid::{
    CellId,
    Elevation,
    ElevationGrid,
};
pub use report::TrailReport;
pub use resolver::{
    DescentResolver,
    ResolveOptions,
    Trail,
    TrailStep,
};
pub use selector::{
    Selection,
    select_trails,
};
use tracing::{
    info,
    instrument,
};

/// Runs the full pipeline on a parsed grid.
#[instrument(skip_all, fields(rows = grid.rows(), cols = grid.cols()))]
pub fn find_steepest_trails(grid: &ElevationGrid, options: &ResolveOptions) -> Result<TrailReport> {
    let graph = DescentGraph::from_grid(grid);
    let source_vertices = graph.num_sources();
    info!(
        "vertices -> (sources/total): ({}/{})",
        source_vertices,
        graph.num_vertices()
    );
    info!("edges -> total {}", graph.num_edges());

    let resolver = DescentResolver::new(&graph)?;
    let candidates = resolver.source_trails(options);
    let selection = select_trails(candidates);
    info!(
        "Selected {} trails of length {} and drop {}",
        selection.len(),
        selection.max_length,
        selection.max_drop
    );

    Ok(TrailReport::new(
        graph.num_vertices(),
        source_vertices,
        graph.num_edges(),
        selection,
    ))
}
