use std::collections::BTreeMap;
use std::fmt;

/// Vertex identifier as it appears in the graph file
pub type VertexId = usize;

/// Integer vertex or edge label
pub type Label = i64;

/// Label multiset: label -> number of occurrences
pub type LabelCounts = BTreeMap<Label, usize>;

/// An undirected labeled edge, stored once in the order it was added
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    pub label: Label,
}

/// Represents an undirected labeled multigraph.
///
/// Vertices are kept in ascending id order, which is also the order every
/// search in this crate visits them in. Edges are stored once but exposed
/// symmetrically through the adjacency view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    /// Position of the graph in the collection it was read from
    pub id: usize,
    vertices: BTreeMap<VertexId, Label>,
    edges: Vec<Edge>,
    adj: BTreeMap<VertexId, Vec<(VertexId, Label)>>,
}

impl Graph {
    pub fn new(id: usize) -> Self {
        Graph {
            id,
            ..Default::default()
        }
    }

    /// Two vertices joined by one edge: `(0: a) -[e]- (1: b)`
    pub fn single_edge(id: usize, a: Label, e: Label, b: Label) -> Self {
        let mut g = Graph::new(id);
        g.add_vertex(0, a);
        g.add_vertex(1, b);
        g.add_edge(0, 1, e);
        g
    }

    /// Adds a vertex; re-adding an id overwrites its label.
    pub fn add_vertex(&mut self, vertex: VertexId, label: Label) {
        self.vertices.insert(vertex, label);
    }

    /// Adds an undirected edge. Duplicates and self-loops are kept as given.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, label: Label) {
        self.edges.push(Edge { from, to, label });
        self.adj.entry(from).or_default().push((to, label));
        self.adj.entry(to).or_default().push((from, label));
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex_label(&self, vertex: VertexId) -> Option<Label> {
        self.vertices.get(&vertex).copied()
    }

    /// Vertices with their labels, ascending by id
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, Label)> + '_ {
        self.vertices.iter().map(|(&v, &l)| (v, l))
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// `(neighbor, edge label)` pairs one edge away from `vertex`
    pub fn neighbors(&self, vertex: VertexId) -> &[(VertexId, Label)] {
        self.adj.get(&vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether some edge `u -[label]- v` exists
    pub fn has_edge(&self, u: VertexId, v: VertexId, label: Label) -> bool {
        self.neighbors(u)
            .iter()
            .any(|&(n, l)| n == v && l == label)
    }

    /// Labels of both endpoints of `edge`, or `None` if one is undeclared
    pub fn endpoint_labels(&self, edge: &Edge) -> Option<(Label, Label)> {
        Some((self.vertex_label(edge.from)?, self.vertex_label(edge.to)?))
    }

    pub fn vertex_label_counts(&self) -> LabelCounts {
        let mut counts = LabelCounts::new();
        for &label in self.vertices.values() {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    pub fn edge_label_counts(&self) -> LabelCounts {
        let mut counts = LabelCounts::new();
        for edge in &self.edges {
            *counts.entry(edge.label).or_insert(0) += 1;
        }
        counts
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Graph(id={}, V={}, E={})",
            self.id,
            self.num_vertices(),
            self.num_edges()
        )
    }
}

/// Number of fragments every selection and feature matrix is built around
pub const EXPECTED_FRAGMENTS: usize = 50;

// Module declarations
pub mod error;
pub mod features;
pub mod generator;
pub mod identify;
pub mod isomorphism;
pub mod miner;
pub mod npy;
pub mod parser;
pub mod selector;

pub use error::{Error, Result};
