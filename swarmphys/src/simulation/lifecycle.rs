//! Per-frame aging and survivor filtering
//!
//! The update pass rebuilds each live collection by draining it and
//! re-appending the entities that are still alive, so relative order
//! (or priority order, for people) carries over to the next frame.

use std::collections::HashSet;

use super::states::{Edge, Frame, Node, NodeArena, NodeId, People};

/// Whether entities age during the update pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayPolicy {
    /// Decrement life every pass and drop entities that reach zero
    Expire,
    /// Never age, never drop: a steady-state layout
    Steady,
}

impl DecayPolicy {
    /// Age `node` and report whether it survives this pass
    pub fn node_survives(self, node: &mut Node) -> bool {
        match self {
            DecayPolicy::Expire => node.decay(),
            DecayPolicy::Steady => true,
        }
    }

    pub fn edge_survives(self, edge: &mut Edge) -> bool {
        match self {
            DecayPolicy::Expire => edge.decay(),
            DecayPolicy::Steady => true,
        }
    }
}

/// Keep node inside the visible frame
pub fn clamp_into(node: &mut Node, frame: &Frame) {
    node.x = frame.clamp(node.x);
}

/// Age every edge; return survivors in their original order
pub fn filter_edges(mut edges: Vec<Edge>, policy: DecayPolicy) -> Vec<Edge> {
    let mut still_living = Vec::with_capacity(edges.len());
    for mut edge in edges.drain(..) {
        if policy.edge_survives(&mut edge) {
            still_living.push(edge);
        }
    }
    still_living
}

/// Run `step` on each node in order, then age it; return survivors in order
pub fn filter_nodes<F>(
    mut ids: Vec<NodeId>,
    nodes: &mut NodeArena,
    policy: DecayPolicy,
    mut step: F,
) -> Vec<NodeId>
where
    F: FnMut(&mut Node),
{
    let mut still_living = Vec::with_capacity(ids.len());
    for id in ids.drain(..) {
        let node = &mut nodes[id];
        step(node);
        if policy.node_survives(node) {
            still_living.push(id);
        }
    }
    still_living
}

/// Like [`filter_nodes`], polling people in priority order and re-queueing
/// survivors under their updated life
pub fn filter_people<F>(
    mut people: People,
    nodes: &mut NodeArena,
    policy: DecayPolicy,
    mut step: F,
) -> People
where
    F: FnMut(&mut Node),
{
    let mut still_living = People::new(people.order());
    while let Some(id) = people.pop() {
        let node = &mut nodes[id];
        step(node);
        if policy.node_survives(node) {
            still_living.push(id, nodes);
        }
    }
    still_living
}

/// Drop edges whose person or file is no longer in a live collection
/// Expiry is terminal, so an edge never outlives either endpoint
/// Returns how many edges were dropped
pub fn drop_orphaned_edges(edges: &mut Vec<Edge>, files: &[NodeId], people: &People) -> usize {
    let before = edges.len();
    if before == 0 {
        return 0;
    }
    let live: HashSet<NodeId> = files.iter().copied().chain(people.ids()).collect();
    edges.retain(|e| live.contains(&e.from) && live.contains(&e.to));
    before - edges.len()
}
