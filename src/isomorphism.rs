//! Subgraph containment: does a pattern occur inside a target graph?
//!
//! Cheap label/size filters run first; only if they pass does a VF2-style
//! backtracking search look for an injective, label-preserving mapping.

use crate::{Graph, LabelCounts, VertexId};
use std::collections::{BTreeMap, HashMap};

/// Pattern vertex -> target vertex
pub type Embedding = BTreeMap<VertexId, VertexId>;

/// Necessary conditions for `pattern` to be contained in `target`.
///
/// A `false` here is final: no search is ever run for such a pair.
pub fn pre_filter(pattern: &Graph, target: &Graph) -> bool {
    pattern.num_vertices() <= target.num_vertices()
        && pattern.num_edges() <= target.num_edges()
        && covers(&target.vertex_label_counts(), &pattern.vertex_label_counts())
        && covers(&target.edge_label_counts(), &pattern.edge_label_counts())
}

fn covers(have: &LabelCounts, need: &LabelCounts) -> bool {
    need.iter()
        .all(|(label, &count)| have.get(label).copied().unwrap_or(0) >= count)
}

/// True iff `pattern` is isomorphic to some subgraph of `target`
pub fn is_subgraph(pattern: &Graph, target: &Graph) -> bool {
    find_embedding(pattern, target).is_some()
}

/// First embedding of `pattern` into `target` found by the search, if any.
///
/// Pattern vertices are mapped in ascending id order and candidates are tried
/// in the target's ascending id order, so the result is deterministic.
pub fn find_embedding(pattern: &Graph, target: &Graph) -> Option<Embedding> {
    if !pre_filter(pattern, target) {
        return None;
    }
    if pattern.num_vertices() == 0 {
        return Some(Embedding::new());
    }

    let search = Search {
        pattern,
        target,
        order: pattern.vertices().map(|(v, _)| v).collect(),
    };
    let mut mapping = Bijection::default();
    if search.extend(0, &mut mapping) {
        Some(mapping.forward.into_iter().collect())
    } else {
        None
    }
}

/// Read-only inputs of one containment query
struct Search<'a> {
    pattern: &'a Graph,
    target: &'a Graph,
    order: Vec<VertexId>,
}

/// Partial injective mapping, kept consistent in both directions
#[derive(Debug, Default)]
struct Bijection {
    forward: HashMap<VertexId, VertexId>,
    backward: HashMap<VertexId, VertexId>,
}

impl Bijection {
    fn image(&self, pv: VertexId) -> Option<VertexId> {
        self.forward.get(&pv).copied()
    }

    fn is_used(&self, tv: VertexId) -> bool {
        self.backward.contains_key(&tv)
    }

    fn insert(&mut self, pv: VertexId, tv: VertexId) {
        self.forward.insert(pv, tv);
        self.backward.insert(tv, pv);
    }

    fn remove(&mut self, pv: VertexId, tv: VertexId) {
        self.forward.remove(&pv);
        self.backward.remove(&tv);
    }
}

impl Search<'_> {
    /// Recursive backtracking: map `order[depth..]` given the current mapping
    fn extend(&self, depth: usize, mapping: &mut Bijection) -> bool {
        let Some(&pv) = self.order.get(depth) else {
            // All pattern vertices mapped
            return true;
        };

        for (tv, _) in self.target.vertices() {
            if mapping.is_used(tv) || !self.is_feasible(pv, tv, mapping) {
                continue;
            }

            mapping.insert(pv, tv);
            if self.extend(depth + 1, mapping) {
                return true;
            }
            mapping.remove(pv, tv);
        }

        false
    }

    /// Vertex labels agree and every edge to an already-mapped neighbor exists in the target
    fn is_feasible(&self, pv: VertexId, tv: VertexId, mapping: &Bijection) -> bool {
        match (self.pattern.vertex_label(pv), self.target.vertex_label(tv)) {
            (Some(p), Some(t)) if p == t => {}
            _ => return false,
        }

        self.pattern
            .neighbors(pv)
            .iter()
            .all(|&(neighbor, label)| match mapping.image(neighbor) {
                Some(image) => self.target.has_edge(tv, image, label),
                None => true,
            })
    }
}
