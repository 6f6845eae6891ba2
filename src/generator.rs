//! Random labeled graph databases for demos and benchmarks.

use crate::{Graph, Label};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    pub graphs: usize,
    pub min_vertices: usize,
    pub max_vertices: usize,
    /// Probability of an extra edge between two non-adjacent vertices
    pub density: f64,
    /// Vertex labels are drawn from `0..vertex_labels`
    pub vertex_labels: usize,
    /// Edge labels are drawn from `0..edge_labels`
    pub edge_labels: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            graphs: 100,
            min_vertices: 4,
            max_vertices: 12,
            density: 0.15,
            vertex_labels: 6,
            edge_labels: 3,
        }
    }
}

fn random_label<R: Rng>(rng: &mut R, count: usize) -> Label {
    rng.gen_range(0..count.max(1) as Label)
}

/// Build a random connected graph: a random spanning tree plus noise edges
pub fn random_graph<R: Rng>(id: usize, config: &GeneratorConfig, rng: &mut R) -> Graph {
    let n = rng.gen_range(config.min_vertices..=config.max_vertices.max(config.min_vertices));
    let mut g = Graph::new(id);
    for v in 0..n {
        g.add_vertex(v, random_label(rng, config.vertex_labels));
    }

    // Attach every vertex to an earlier one
    for v in 1..n {
        let parent = rng.gen_range(0..v);
        g.add_edge(parent, v, random_label(rng, config.edge_labels));
    }

    for u in 0..n {
        for v in (u + 1)..n {
            if g.neighbors(u).iter().any(|&(w, _)| w == v) {
                continue;
            }
            if rng.gen::<f64>() < config.density {
                g.add_edge(u, v, random_label(rng, config.edge_labels));
            }
        }
    }
    g
}

pub fn random_database<R: Rng>(config: &GeneratorConfig, rng: &mut R) -> Vec<Graph> {
    (0..config.graphs)
        .map(|id| random_graph(id, config, rng))
        .collect()
}
