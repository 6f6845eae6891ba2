//! End-to-end discovery of discriminative fragments for a graph database.
//!
//! The database is de-duplicated, mined at increasing support thresholds
//! until the candidate pool is large enough, and the pool is then scored
//! and narrowed down by the selector.

use crate::miner::{edge_triples, MinerConfig, PatternMiner};
use crate::selector::{dedupe_structural, score_fragments, select_fragments, Selection, SelectionConfig};
use crate::{Error, Graph, Result};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifyConfig {
    /// Support thresholds, as fractions of the unique database, tried in order
    pub support_thresholds: Vec<f64>,
    /// Smallest absolute support ever mined with
    pub min_support_floor: usize,
    /// Mining stops once the candidate pool holds this many patterns
    pub pool_target: usize,
    pub max_edges: usize,
    pub selection: SelectionConfig,
}

impl Default for IdentifyConfig {
    fn default() -> Self {
        IdentifyConfig {
            support_thresholds: vec![0.05, 0.10, 0.15, 0.20, 0.30, 0.40],
            min_support_floor: 2,
            pool_target: 200,
            max_edges: 4,
            selection: SelectionConfig::default(),
        }
    }
}

impl IdentifyConfig {
    pub fn with_support_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.support_thresholds = thresholds;
        self
    }

    pub fn with_pool_target(mut self, pool_target: usize) -> Self {
        self.pool_target = pool_target;
        self
    }

    pub fn with_selection(mut self, selection: SelectionConfig) -> Self {
        self.selection = selection;
        self
    }

    /// Absolute support for a threshold over a database of `len` graphs
    pub fn min_support(&self, threshold: f64, len: usize) -> usize {
        self.min_support_floor
            .max((threshold * len as f64).floor() as usize)
    }
}

/// Frequent patterns mined at each threshold, concatenated
pub fn candidate_pool(database: &[Graph], config: &IdentifyConfig) -> Vec<Graph> {
    let mut pool = Vec::new();
    for &threshold in &config.support_thresholds {
        if pool.len() >= config.pool_target {
            break;
        }
        let min_support = config.min_support(threshold, database.len());
        info!(min_support, threshold, "mining");

        let miner_config = MinerConfig::default()
            .with_min_support(min_support)
            .with_max_edges(config.max_edges);
        let mined = PatternMiner::new(database, miner_config).mine();
        info!(found = mined.len(), "frequent subgraphs");
        pool.extend(mined);
    }
    pool
}

/// Plain single-edge patterns for every distinct edge shape, at most `limit`
pub fn fallback_fragments(database: &[Graph], limit: usize) -> Vec<Graph> {
    edge_triples(database)
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(id, (a, e, b))| Graph::single_edge(id, a, e, b))
        .collect()
}

/// Mines, scores and selects the fragment basis for `database`
pub fn discover_fragments(database: &[Graph], config: &IdentifyConfig) -> Result<Selection> {
    if database.is_empty() {
        return Err(Error::EmptyDatabase);
    }

    let unique = dedupe_structural(database.iter().cloned());
    info!(graphs = database.len(), unique = unique.len(), "deduplicated database");

    let mut pool = candidate_pool(&unique, config);
    info!(candidates = pool.len(), "mining finished");
    if pool.is_empty() {
        warn!("no frequent fragments found, falling back to single-edge fragments");
        pool = fallback_fragments(&unique, config.pool_target);
    }

    let pool = dedupe_structural(pool);
    info!(unique = pool.len(), "deduplicated fragments");

    let scored = score_fragments(pool, &unique, &config.selection);
    let selection = select_fragments(&scored, &unique, &config.selection);
    info!(
        selected = selection.fragments.len(),
        strict = selection.strict,
        relaxed = selection.relaxed,
        padded = selection.padded,
        "selection finished"
    );
    if selection.fragments.len() != config.selection.target_count {
        warn!(
            have = selection.fragments.len(),
            expected = config.selection.target_count,
            "fragment count differs from target"
        );
    }
    Ok(selection)
}
