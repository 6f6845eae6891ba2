//! Scoring and redundancy-aware selection of discriminative fragments.

use crate::isomorphism::is_subgraph;
use crate::miner::support;
use crate::{Graph, Label, EXPECTED_FRAGMENTS};
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionConfig {
    /// Exact number of fragments to return
    pub target_count: usize,
    /// Largest Jaccard similarity tolerated against an already selected fragment
    pub redundancy_threshold: f64,
    /// Score penalty per fragment edge
    pub size_penalty: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        SelectionConfig {
            target_count: EXPECTED_FRAGMENTS,
            redundancy_threshold: 0.7,
            size_penalty: 0.1,
        }
    }
}

impl SelectionConfig {
    pub fn with_target_count(mut self, target_count: usize) -> Self {
        self.target_count = target_count;
        self
    }

    pub fn with_redundancy_threshold(mut self, threshold: f64) -> Self {
        self.redundancy_threshold = threshold;
        self
    }

    pub fn with_size_penalty(mut self, penalty: f64) -> Self {
        self.size_penalty = penalty;
        self
    }
}

/// Size and label profile of a graph; equal keys are treated as duplicates
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuralKey {
    vertices: usize,
    edges: usize,
    vertex_labels: Vec<(Label, usize)>,
    edge_labels: Vec<(Label, usize)>,
}

impl StructuralKey {
    pub fn of(g: &Graph) -> Self {
        StructuralKey {
            vertices: g.num_vertices(),
            edges: g.num_edges(),
            vertex_labels: g.vertex_label_counts().into_iter().collect(),
            edge_labels: g.edge_label_counts().into_iter().collect(),
        }
    }
}

/// Keeps the first graph of every structural-key class, preserving order
pub fn dedupe_structural(graphs: impl IntoIterator<Item = Graph>) -> Vec<Graph> {
    let mut seen = HashSet::new();
    graphs
        .into_iter()
        .filter(|g| seen.insert(StructuralKey::of(g)))
        .collect()
}

/// `-p·log2(p) - (1-p)·log2(1-p)`, zero at both ends
pub fn binary_entropy(p: f64) -> f64 {
    if p > 0.0 && p < 1.0 {
        -p * p.log2() - (1.0 - p) * (1.0 - p).log2()
    } else {
        0.0
    }
}

/// Entropy of occurrence minus a penalty proportional to fragment size
pub fn entropy_score(support_ratio: f64, edge_count: usize, size_penalty: f64) -> f64 {
    binary_entropy(support_ratio) - size_penalty * edge_count as f64
}

/// One flag per database graph: does it contain `fragment`?
pub fn presence_vector(fragment: &Graph, database: &[Graph]) -> Vec<bool> {
    database
        .par_iter()
        .map(|g| is_subgraph(fragment, g))
        .collect()
}

/// |a ∧ b| / |a ∨ b|, or 0 when neither vector has a set flag
pub fn jaccard(a: &[bool], b: &[bool]) -> f64 {
    let (intersection, union) = a
        .iter()
        .zip(b)
        .fold((0usize, 0usize), |(i, u), (&x, &y)| {
            (i + usize::from(x && y), u + usize::from(x || y))
        });
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

#[derive(Debug, Clone)]
pub struct FragmentScore {
    pub fragment: Graph,
    pub support_ratio: f64,
    pub score: f64,
    pub edge_count: usize,
    /// Index in the candidate pool, used to break score ties
    position: usize,
}

/// Scores every candidate against `database`, best first.
///
/// Equal scores keep their pool order.
pub fn score_fragments(
    pool: Vec<Graph>,
    database: &[Graph],
    config: &SelectionConfig,
) -> Vec<FragmentScore> {
    let mut scored: Vec<FragmentScore> = pool
        .into_iter()
        .enumerate()
        .map(|(position, fragment)| {
            let support_ratio = if database.is_empty() {
                0.0
            } else {
                support(&fragment, database) as f64 / database.len() as f64
            };
            let edge_count = fragment.num_edges();
            FragmentScore {
                score: entropy_score(support_ratio, edge_count, config.size_penalty),
                fragment,
                support_ratio,
                edge_count,
                position,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.position.cmp(&b.position))
    });
    scored
}

/// Outcome of a selection run
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub fragments: Vec<Graph>,
    /// Picked by the redundancy-aware pass
    pub strict: usize,
    /// Picked by the relaxed pass that ignores presence vectors
    pub relaxed: usize,
    /// Repeated candidates appended to reach the target count
    pub padded: usize,
}

/// Same vertex count, edge count and vertex-label multiset
fn same_shape(a: &Graph, b: &Graph) -> bool {
    a.num_vertices() == b.num_vertices()
        && a.num_edges() == b.num_edges()
        && a.vertex_label_counts() == b.vertex_label_counts()
}

/// Picks exactly `config.target_count` fragments whenever `scored` is non-empty.
///
/// Greedy pass over the ranking, rejecting any fragment whose presence vector
/// is too similar to one already chosen. A shortfall is filled by a relaxed
/// pass skipping only same-shape fragments, then by cycling through the
/// ranking, so the result may contain duplicates.
pub fn select_fragments(
    scored: &[FragmentScore],
    database: &[Graph],
    config: &SelectionConfig,
) -> Selection {
    let target = config.target_count;
    let mut selected: Vec<Graph> = Vec::new();
    let mut presences: Vec<Vec<bool>> = Vec::new();

    for fs in scored {
        if selected.len() >= target {
            break;
        }
        let presence = presence_vector(&fs.fragment, database);
        let redundant = presences
            .iter()
            .any(|existing| jaccard(&presence, existing) > config.redundancy_threshold);
        if !redundant {
            selected.push(fs.fragment.clone());
            presences.push(presence);
            debug!(
                n = selected.len(),
                vertices = fs.fragment.num_vertices(),
                edges = fs.edge_count,
                support = fs.support_ratio,
                score = fs.score,
                "selected fragment"
            );
        }
    }
    let strict = selected.len();

    if selected.len() < target {
        info!(have = selected.len(), target, "relaxing redundancy to fill selection");
        for fs in scored {
            if selected.len() >= target {
                break;
            }
            if !selected.iter().any(|s| same_shape(s, &fs.fragment)) {
                selected.push(fs.fragment.clone());
            }
        }
    }
    let relaxed = selected.len() - strict;

    if selected.len() < target && !scored.is_empty() {
        info!(have = selected.len(), target, "padding selection with repeated fragments");
        while selected.len() < target {
            let idx = selected.len() % scored.len();
            selected.push(scored[idx].fragment.clone());
        }
    }
    let padded = selected.len() - strict - relaxed;

    selected.truncate(target);
    Selection {
        fragments: selected,
        strict,
        relaxed,
        padded,
    }
}
