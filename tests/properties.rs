//! Property tests for containment, similarity and feature encoding.

use proptest::prelude::*;
use subgraph_feature_index::{
    features::{candidates_for, FeatureMatrix},
    isomorphism::{is_subgraph, pre_filter},
    npy,
    selector::{jaccard, score_fragments, select_fragments, SelectionConfig},
    Graph, Label, EXPECTED_FRAGMENTS,
};

fn build(vertex_labels: Vec<Label>, edges: Vec<(usize, usize, Label)>) -> Graph {
    let mut g = Graph::new(0);
    for (v, label) in vertex_labels.into_iter().enumerate() {
        g.add_vertex(v, label);
    }
    for (u, v, label) in edges {
        if u != v {
            g.add_edge(u, v, label);
        }
    }
    g
}

fn arb_graph(max_vertices: usize) -> impl Strategy<Value = Graph> {
    (1..=max_vertices)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(0..3i64, n),
                prop::collection::vec((0..n, 0..n, 0..2i64), 0..=2 * n),
            )
        })
        .prop_map(|(labels, edges)| build(labels, edges))
}

/// A subset of `g`'s edges with their endpoints, under shifted vertex ids
fn edge_subset(g: &Graph, keep: &[bool]) -> Graph {
    let mut p = Graph::new(1);
    for (e, _) in g.edges().iter().zip(keep).filter(|&(_, &k)| k) {
        for v in [e.from, e.to] {
            p.add_vertex(3 * v + 1, g.vertex_label(v).unwrap());
        }
        p.add_edge(3 * e.from + 1, 3 * e.to + 1, e.label);
    }
    p
}

fn arb_matrix() -> impl Strategy<Value = FeatureMatrix> {
    (0..5usize, 0..6usize)
        .prop_flat_map(|(rows, cols)| {
            (
                Just(rows),
                Just(cols),
                prop::collection::vec(0..=1u8, rows * cols),
            )
        })
        .prop_map(|(rows, cols, data)| FeatureMatrix::from_raw(rows, cols, data).unwrap())
}

proptest! {
    /// Containment implies the cheap filter passes
    #[test]
    fn containment_implies_prefilter(p in arb_graph(4), t in arb_graph(6)) {
        if is_subgraph(&p, &t) {
            prop_assert!(pre_filter(&p, &t));
        }
        if !pre_filter(&p, &t) {
            prop_assert!(!is_subgraph(&p, &t));
        }
    }

    /// Every graph contains itself and the empty pattern
    #[test]
    fn reflexive(g in arb_graph(6)) {
        prop_assert!(is_subgraph(&g, &g));
        prop_assert!(is_subgraph(&Graph::new(0), &g));
    }

    /// Any edge subset of a graph is found in it, whatever the vertex ids
    #[test]
    fn edge_subsets_are_contained(
        g in arb_graph(6),
        keep in prop::collection::vec(any::<bool>(), 12),
    ) {
        let p = edge_subset(&g, &keep);
        prop_assert!(is_subgraph(&p, &g));
    }

    /// Growing the target never loses a containment
    #[test]
    fn containment_is_monotone(
        p in arb_graph(3),
        t in arb_graph(5),
        label in 0..3i64,
        attach in prop::collection::vec((any::<bool>(), 0..2i64), 5),
    ) {
        let mut bigger = t.clone();
        let fresh = 100;
        bigger.add_vertex(fresh, label);
        let targets: Vec<_> = t.vertices().map(|(v, _)| v).collect();
        for (v, (connect, edge_label)) in targets.into_iter().zip(attach) {
            if connect {
                bigger.add_edge(fresh, v, edge_label);
            }
        }
        if is_subgraph(&p, &t) {
            prop_assert!(is_subgraph(&p, &bigger));
        }
    }

    #[test]
    fn jaccard_is_a_bounded_symmetric_similarity(
        pairs in prop::collection::vec(any::<(bool, bool)>(), 0..20),
    ) {
        let (a, b): (Vec<bool>, Vec<bool>) = pairs.into_iter().unzip();
        let s = jaccard(&a, &b);
        prop_assert_eq!(s, jaccard(&b, &a));
        prop_assert!((0.0..=1.0).contains(&s));
        let any_set = a.iter().chain(&b).any(|&x| x);
        prop_assert_eq!(s == 1.0, a == b && any_set);
    }

    #[test]
    fn all_zero_query_keeps_every_row(m in arb_matrix()) {
        let query = vec![0u8; m.cols()];
        prop_assert_eq!(candidates_for(&m, &query), (0..m.rows()).collect::<Vec<_>>());
    }

    #[test]
    fn feature_matrix_survives_encoding(m in arb_matrix()) {
        prop_assert_eq!(npy::decode(&npy::encode(&m)).unwrap(), m);
    }

    /// Any non-empty pool yields exactly the target count
    #[test]
    fn selection_always_fills_target(
        db in prop::collection::vec(arb_graph(4), 1..4),
        pool in prop::collection::vec(arb_graph(3), 1..6),
    ) {
        let config = SelectionConfig::default();
        let scored = score_fragments(pool, &db, &config);
        let selection = select_fragments(&scored, &db, &config);
        prop_assert_eq!(selection.fragments.len(), EXPECTED_FRAGMENTS);
    }
}
