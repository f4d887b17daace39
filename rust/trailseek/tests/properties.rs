use proptest::prelude::*;
use trailseek::{
    DescentGraph,
    DescentResolver,
    ElevationGrid,
    ResolveOptions,
    Trail,
    VertexIdx,
    find_steepest_trails,
};

fn grid_strategy() -> impl Strategy<Value = ElevationGrid> {
    (1usize..8, 1usize..8).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::collection::vec(0i64..6, cols), rows)
            .prop_map(move |data| ElevationGrid::new(rows, cols, data).unwrap())
    })
}

/// Best trail from `v` by plain recursion: longest first, then largest drop
/// from `v`, then the first child in edge order.
fn naive_best(graph: &DescentGraph, v: VertexIdx) -> Vec<VertexIdx> {
    let value = graph.vertex(v).value;
    let mut best: Vec<VertexIdx> = Vec::new();
    for child in graph.children(v) {
        let path = naive_best(graph, child);
        let drop_from_v = |p: &[VertexIdx]| value - graph.vertex(p[p.len() - 1]).value;
        let longer = path.len() > best.len();
        if longer || (path.len() == best.len() && drop_from_v(&path) > drop_from_v(&best)) {
            best = path;
        }
    }
    let mut out = vec![v];
    out.extend(best);
    out
}

fn assert_valid_trail(graph: &DescentGraph, trail: &Trail) {
    assert!(!trail.is_empty());
    for pair in trail.steps().windows(2) {
        let from = graph.index_of(pair[0].id).unwrap();
        let to = graph.index_of(pair[1].id).unwrap();
        assert!(graph.has_edge(from, to), "{} -> {} is not an edge", pair[0].id, pair[1].id);
        assert!(pair[0].value > pair[1].value);
    }
}

proptest! {
    #[test]
    fn edges_never_form_a_cycle(grid in grid_strategy()) {
        let graph = DescentGraph::from_grid(&grid);
        let order = graph.topological_order().unwrap();
        prop_assert_eq!(order.len(), graph.num_vertices());
        let mut position = vec![0; order.len()];
        for (pos, v) in order.iter().enumerate() {
            position[*v] = pos;
        }
        for e in graph.edges() {
            prop_assert!(position[e.from] < position[e.to]);
            prop_assert!(graph.vertex(e.from).value > graph.vertex(e.to).value);
        }
    }

    #[test]
    fn sources_are_strict_local_maxima(grid in grid_strategy()) {
        let graph = DescentGraph::from_grid(&grid);
        for v in graph.vertices() {
            let strict_max = grid.neighbors(v.id).all(|(_, n)| n < v.value);
            prop_assert_eq!(v.is_source, strict_max);
        }
    }

    #[test]
    fn source_trails_are_valid_and_longest(grid in grid_strategy()) {
        let graph = DescentGraph::from_grid(&grid);
        let resolver = DescentResolver::new(&graph).unwrap();
        let sources: Vec<_> = graph.sources().collect();
        let trails = resolver.source_trails(&ResolveOptions::default());
        prop_assert_eq!(trails.len(), sources.len());
        for (s, trail) in sources.iter().zip(trails.iter()) {
            assert_valid_trail(&graph, trail);
            prop_assert_eq!(trail.first().id, graph.vertex(*s).id);
            prop_assert_eq!(trail.len(), naive_best(&graph, *s).len());
            let last = graph.index_of(trail.last().id).unwrap();
            prop_assert_eq!(graph.outgoing_edges(last).len(), 0);
        }
    }

    #[test]
    fn every_vertex_follows_the_tie_break_rules(grid in grid_strategy()) {
        let graph = DescentGraph::from_grid(&grid);
        let resolver = DescentResolver::new(&graph).unwrap();
        for v in 0..graph.num_vertices() {
            let expected: Vec<_> = naive_best(&graph, v)
                .into_iter()
                .map(|i| graph.vertex(i).id)
                .collect();
            let actual: Vec<_> = resolver.best_trail(v).steps().iter().map(|s| s.id).collect();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn selection_is_maximal(grid in grid_strategy()) {
        let graph = DescentGraph::from_grid(&grid);
        let resolver = DescentResolver::new(&graph).unwrap();
        let candidates = resolver.source_trails(&ResolveOptions::default());
        let report = find_steepest_trails(&grid, &ResolveOptions::default()).unwrap();

        prop_assert_eq!(report.path_count, report.paths.len());
        for c in candidates.iter() {
            prop_assert!(c.len() <= report.max_length);
            if c.len() == report.max_length {
                prop_assert!(c.elevation_drop() <= report.max_drop);
            }
        }
        for p in report.paths.iter() {
            assert_valid_trail(&graph, p);
            prop_assert_eq!(p.len(), report.max_length);
            prop_assert_eq!(p.elevation_drop(), report.max_drop);
        }
        let expected = candidates
            .iter()
            .filter(|c| c.len() == report.max_length && c.elevation_drop() == report.max_drop)
            .count();
        prop_assert_eq!(report.path_count, expected);
    }

    #[test]
    fn runs_are_deterministic(grid in grid_strategy()) {
        let first = find_steepest_trails(&grid, &ResolveOptions::default()).unwrap();
        let second = find_steepest_trails(&grid, &ResolveOptions::default()).unwrap();
        let parallel = find_steepest_trails(
            &grid,
            &ResolveOptions { parallel: true, show_progress: false },
        )
        .unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &parallel);
    }
}
