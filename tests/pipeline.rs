//! End-to-end scenarios across mining, selection and candidate filtering.

use rand::{rngs::StdRng, SeedableRng};
use subgraph_feature_index::{
    features::{filter_candidates, FeatureMatrix},
    generator::{random_database, GeneratorConfig},
    identify::{discover_fragments, IdentifyConfig},
    isomorphism::is_subgraph,
    miner::{path_pattern, support, MinerConfig, PatternMiner},
    selector::{score_fragments, select_fragments, SelectionConfig, StructuralKey},
    Graph, EXPECTED_FRAGMENTS,
};

fn edge_database() -> Vec<Graph> {
    let a = Graph::single_edge(0, 1, 0, 2);
    let mut b = Graph::new(1);
    b.add_vertex(0, 1);
    b.add_vertex(1, 2);
    b.add_vertex(2, 3);
    b.add_edge(0, 1, 0);
    b.add_edge(1, 2, 0);
    b.add_edge(2, 0, 0);
    vec![a, b]
}

#[test]
fn mining_keeps_shared_edge_and_drops_rare_paths() {
    let db = edge_database();
    let mined = PatternMiner::new(&db, MinerConfig::default().with_min_support(2)).mine();

    let shared = Graph::single_edge(0, 1, 0, 2);
    assert!(mined
        .iter()
        .any(|p| StructuralKey::of(p) == StructuralKey::of(&shared)));
    assert_eq!(support(&shared, &db), 2);

    // Every pattern mentioning label 3 only occurs in the triangle
    assert!(mined
        .iter()
        .all(|p| p.vertices().all(|(_, label)| label != 3)));
    assert!(mined.iter().all(|p| p.num_edges() == 1));
    assert_eq!(support(&path_pattern(0, [1, 2, 3], [0, 0]), &db), 1);
}

#[test]
fn redundant_pool_is_padded_to_exactly_fifty() {
    let db = vec![
        path_pattern(0, [1, 2, 3], [0, 0]),
        path_pattern(1, [1, 2, 3], [0, 0]),
    ];
    let pool = vec![
        Graph::single_edge(0, 1, 0, 2),
        Graph::single_edge(1, 2, 0, 3),
        path_pattern(2, [1, 2, 3], [0, 0]),
        path_pattern(3, [3, 2, 1], [0, 0]),
    ];
    let config = SelectionConfig::default();
    let scored = score_fragments(pool, &db, &config);
    assert!(scored.iter().all(|s| s.support_ratio > 0.0));

    let selection = select_fragments(&scored, &db, &config);
    assert_eq!(selection.strict, 1);
    assert_eq!(selection.fragments.len(), EXPECTED_FRAGMENTS);
    assert_eq!(selection.strict + selection.relaxed + selection.padded, EXPECTED_FRAGMENTS);
}

#[test]
fn discovered_features_never_prune_true_matches() {
    let config = GeneratorConfig {
        graphs: 30,
        min_vertices: 3,
        max_vertices: 7,
        density: 0.2,
        vertex_labels: 4,
        edge_labels: 2,
    };
    let db = random_database(&config, &mut StdRng::seed_from_u64(11));
    let selection = discover_fragments(&db, &IdentifyConfig::default()).unwrap();
    assert_eq!(selection.fragments.len(), EXPECTED_FRAGMENTS);

    let db_features = FeatureMatrix::build(&db, &selection.fragments);
    assert_eq!(db_features.rows(), db.len());
    assert_eq!(db_features.cols(), EXPECTED_FRAGMENTS);

    // Queries: single edges of a few database graphs plus whole graphs
    let mut queries: Vec<Graph> = db.iter().take(5).cloned().collect();
    for g in db.iter().take(5) {
        if let Some(e) = g.edges().first() {
            let (a, b) = g.endpoint_labels(e).unwrap();
            queries.push(Graph::single_edge(queries.len(), a, e.label, b));
        }
    }
    let query_features = FeatureMatrix::build(&queries, &selection.fragments);
    let candidates = filter_candidates(&db_features, &query_features).unwrap();

    for (q, query) in queries.iter().enumerate() {
        for (i, g) in db.iter().enumerate() {
            if is_subgraph(query, g) {
                assert!(candidates[q].contains(&i), "query {q} lost true match {i}");
            }
        }
    }
}

#[test]
fn duplicate_database_graphs_do_not_change_selection_size() {
    let mut db = edge_database();
    db.extend(edge_database());
    let selection = discover_fragments(&db, &IdentifyConfig::default()).unwrap();
    assert_eq!(selection.fragments.len(), EXPECTED_FRAGMENTS);
}

#[test]
fn smaller_target_counts_are_honoured() {
    let config = IdentifyConfig::default()
        .with_selection(SelectionConfig::default().with_target_count(5));
    let selection = discover_fragments(&edge_database(), &config).unwrap();
    assert_eq!(selection.fragments.len(), 5);
}
