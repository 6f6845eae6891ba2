//! Bounded frequent-pattern enumeration over small connected shapes.
//!
//! Only single edges and three-vertex paths are generated. The search space
//! for paths is capped, so this is not a complete frequent-subgraph miner.

use crate::isomorphism::is_subgraph;
use crate::{Graph, Label};
use itertools::iproduct;
use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Paths are only mined while fewer single-edge patterns than this were found
pub const SINGLE_EDGE_LIMIT_FOR_PATHS: usize = 100;
/// Distinct vertex labels considered for path candidates (smallest first)
pub const MAX_VERTEX_LABELS: usize = 10;
/// Distinct edge labels considered for path candidates (smallest first)
pub const MAX_EDGE_LABELS: usize = 5;
/// Path candidates whose support is counted before giving up
pub const MAX_PATH_EVALUATIONS: usize = 500;
/// Frequent path patterns kept at most
pub const MAX_PATH_PATTERNS: usize = 100;

/// Canonical single-edge shape: (smaller vertex label, edge label, larger vertex label)
pub type EdgeTriple = (Label, Label, Label);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinerConfig {
    /// Number of database graphs a pattern must occur in
    pub min_support: usize,
    /// Largest pattern size, in edges, the caller is interested in
    pub max_edges: usize,
}

impl Default for MinerConfig {
    fn default() -> Self {
        MinerConfig {
            min_support: 2,
            max_edges: 4,
        }
    }
}

impl MinerConfig {
    pub fn with_min_support(mut self, min_support: usize) -> Self {
        self.min_support = min_support;
        self
    }

    pub fn with_max_edges(mut self, max_edges: usize) -> Self {
        self.max_edges = max_edges;
        self
    }
}

/// Number of database graphs containing `pattern`
pub fn support(pattern: &Graph, database: &[Graph]) -> usize {
    database
        .par_iter()
        .filter(|g| is_subgraph(pattern, g))
        .count()
}

/// Distinct canonical edge triples in the database.
///
/// Edges touching an undeclared vertex are skipped.
pub fn edge_triples(database: &[Graph]) -> BTreeSet<EdgeTriple> {
    let mut triples = BTreeSet::new();
    for g in database {
        for edge in g.edges() {
            let Some((a, b)) = g.endpoint_labels(edge) else {
                trace!(graph = g.id, ?edge, "skipping edge with undeclared endpoint");
                continue;
            };
            triples.insert((a.min(b), edge.label, a.max(b)));
        }
    }
    triples
}

/// Three-vertex path `v0 -[e0]- v1 -[e1]- v2`
pub fn path_pattern(id: usize, vertex_labels: [Label; 3], edge_labels: [Label; 2]) -> Graph {
    let mut g = Graph::new(id);
    for (v, &label) in vertex_labels.iter().enumerate() {
        g.add_vertex(v, label);
    }
    g.add_edge(0, 1, edge_labels[0]);
    g.add_edge(1, 2, edge_labels[1]);
    g
}

/// Lazy sequence of every path candidate over the given label sets.
///
/// Candidates come in nested lexicographic order of
/// `(v0, v1, v2, e0, e1)` indices; the consumer decides how many to examine.
pub fn path_candidates<'a>(
    vertex_labels: &'a [Label],
    edge_labels: &'a [Label],
) -> impl Iterator<Item = Graph> + 'a {
    iproduct!(
        vertex_labels,
        vertex_labels,
        vertex_labels,
        edge_labels,
        edge_labels
    )
    .enumerate()
    .map(|(id, (&a, &b, &c, &e0, &e1))| path_pattern(id, [a, b, c], [e0, e1]))
}

/// Mines frequent single-edge and path patterns from a graph database
pub struct PatternMiner<'a> {
    database: &'a [Graph],
    config: MinerConfig,
}

impl<'a> PatternMiner<'a> {
    pub fn new(database: &'a [Graph], config: MinerConfig) -> Self {
        PatternMiner { database, config }
    }

    /// Single-edge patterns first (in triple order), then path patterns
    pub fn mine(&self) -> Vec<Graph> {
        debug!(min_support = self.config.min_support, "mining 1-edge patterns");
        let mut patterns = self.single_edge_patterns();
        debug!(found = patterns.len(), "frequent 1-edge patterns");

        if self.config.max_edges >= 2 && patterns.len() < SINGLE_EDGE_LIMIT_FOR_PATHS {
            debug!("mining 2-edge patterns");
            let paths = self.path_patterns();
            debug!(found = paths.len(), "frequent 2-edge patterns");
            patterns.extend(paths);
        }

        patterns
    }

    fn is_frequent(&self, pattern: &Graph) -> bool {
        support(pattern, self.database) >= self.config.min_support
    }

    pub fn single_edge_patterns(&self) -> Vec<Graph> {
        edge_triples(self.database)
            .into_iter()
            .enumerate()
            .map(|(id, (a, e, b))| Graph::single_edge(id, a, e, b))
            .filter(|pattern| self.is_frequent(pattern))
            .collect()
    }

    pub fn path_patterns(&self) -> Vec<Graph> {
        let mut vertex_labels = BTreeSet::new();
        let mut edge_labels = BTreeSet::new();
        for g in self.database {
            vertex_labels.extend(g.vertices().map(|(_, label)| label));
            edge_labels.extend(g.edges().iter().map(|e| e.label));
        }
        let vertex_labels: Vec<Label> = vertex_labels.into_iter().take(MAX_VERTEX_LABELS).collect();
        let edge_labels: Vec<Label> = edge_labels.into_iter().take(MAX_EDGE_LABELS).collect();

        let mut accepted = Vec::new();
        for candidate in path_candidates(&vertex_labels, &edge_labels).take(MAX_PATH_EVALUATIONS) {
            if self.is_frequent(&candidate) {
                accepted.push(candidate);
                if accepted.len() >= MAX_PATH_PATTERNS {
                    break;
                }
            }
        }
        accepted
    }
}
