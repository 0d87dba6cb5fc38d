//! Core state types for the swarm simulation.
//!
//! Defines the entities the physics core works on:
//! - `Node` (person or file) stored in a `NodeArena`, addressed by `NodeId`
//! - `Edge` linking one person to one file by id
//! - `People`, the priority-ordered live person collection
//! - `Frame`, the visible area every position is clamped into
//!
//! The driver owns all of these. The engine only mutates fields and filters
//! the live collections it is handed.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::ops::{Index, IndexMut};

use super::vector::{clamp_to, NVec2};

pub const PERSON_MASS: f32 = 10.0;
pub const PERSON_MAX_SPEED: f32 = 2.0;
pub const PERSON_LIFE_DECREMENT: u32 = 1;
pub const FILE_MASS: f32 = 1.0;
pub const FILE_MAX_SPEED: f32 = 7.0;
pub const FILE_LIFE_DECREMENT: u32 = 2;
pub const EDGE_LEN: f32 = 25.0;
pub const EDGE_LIFE_DECREMENT: u32 = 2;
pub const LIFE_INIT: u32 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Person,
    File,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Person => "person",
            NodeKind::File => "file",
        }
    }
}

/// Index of a node inside its `NodeArena`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub x: NVec2, // position
    pub v: NVec2, // velocity
    pub m: f32, // mass
    pub max_speed: f32, // hard velocity cap
    pub life: u32, // remaining life, 0 = expired
    pub life_init: u32, // life right after creation or freshen
    pub life_decrement: u32, // life lost per update pass
    pub change_magnitude: i32, // size of the latest change touching this node
}

impl Node {
    pub fn person(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Person, PERSON_MASS, PERSON_MAX_SPEED, PERSON_LIFE_DECREMENT)
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::File, FILE_MASS, FILE_MAX_SPEED, FILE_LIFE_DECREMENT)
    }

    fn with_kind(name: impl Into<String>, kind: NodeKind, m: f32, max_speed: f32, life_decrement: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            x: NVec2::zeros(),
            v: NVec2::zeros(),
            m,
            max_speed,
            life: LIFE_INIT,
            life_init: LIFE_INIT,
            life_decrement,
            change_magnitude: 0,
        }
    }

    pub fn at(mut self, x: NVec2) -> Self {
        self.x = x;
        self
    }

    pub fn moving(mut self, v: NVec2) -> Self {
        self.v = v;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Age the node by one update pass
    /// Returns `true` while the node is still alive
    pub fn decay(&mut self) -> bool {
        self.life = self.life.saturating_sub(self.life_decrement);
        self.is_alive()
    }

    /// Restore full life, used when a new event touches the node again
    pub fn freshen(&mut self) {
        self.life = self.life_init;
    }
}

/// Relation between one person (`from`) and one file (`to`)
#[derive(Debug, Clone)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: i32, // sign = direction, magnitude = strength
    pub len: f32, // rest length
    pub life: u32,
    pub life_init: u32,
    pub life_decrement: u32,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, weight: i32) -> Self {
        Self {
            from,
            to,
            weight,
            len: EDGE_LEN,
            life: LIFE_INIT,
            life_init: LIFE_INIT,
            life_decrement: EDGE_LIFE_DECREMENT,
        }
    }

    pub fn with_len(mut self, len: f32) -> Self {
        self.len = len;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// `life / life_init`: 1.0 for a fresh edge, falling to 0 as it ages
    pub fn fade(&self) -> f32 {
        if self.life_init == 0 {
            0.0
        } else {
            self.life as f32 / self.life_init as f32
        }
    }

    pub fn decay(&mut self) -> bool {
        self.life = self.life.saturating_sub(self.life_decrement);
        self.is_alive()
    }

    pub fn freshen(&mut self) {
        self.life = self.life_init;
    }
}

/// Canonical node storage owned by the driver
/// Nodes are never removed; expiry only drops their ids from live collections
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}

/// Poll order of the live person collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonOrder {
    /// First pushed, first polled
    Insertion,
    /// Person with the least remaining life polled first
    LifeAscending,
    /// Person with the most remaining life polled first
    LifeDescending,
}

impl PersonOrder {
    fn key(self, node: &Node) -> i64 {
        match self {
            PersonOrder::Insertion => 0,
            PersonOrder::LifeAscending => -(node.life as i64),
            PersonOrder::LifeDescending => node.life as i64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Ranked {
    key: i64,
    seq: u64,
    id: NodeId,
}

impl Ord for Ranked {
    // BinaryHeap pops the max: higher key first, then lower seq first
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Live person ids, polled in `PersonOrder`
///
/// The ordering key is read from the node when its id is pushed, so mutating
/// a node afterwards does not reorder the collection until it is re-pushed.
#[derive(Debug, Clone)]
pub struct People {
    order: PersonOrder,
    heap: BinaryHeap<Ranked>,
    next_seq: u64,
}

impl People {
    pub fn new(order: PersonOrder) -> Self {
        Self {
            order,
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn order(&self) -> PersonOrder {
        self.order
    }

    pub fn push(&mut self, id: NodeId, nodes: &NodeArena) {
        let key = self.order.key(&nodes[id]);
        self.heap.push(Ranked {
            key,
            seq: self.next_seq,
            id,
        });
        self.next_seq += 1;
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|r| r.id)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.heap.iter().any(|r| r.id == id)
    }

    /// Ids in unspecified order, for passes where order does not matter
    pub fn ids(&self) -> Vec<NodeId> {
        self.heap.iter().map(|r| r.id).collect()
    }

    /// Consume the collection, yielding ids in poll order
    pub fn into_sorted_ids(self) -> Vec<NodeId> {
        self.heap.into_sorted_vec().into_iter().rev().map(|r| r.id).collect()
    }
}

/// Visible area; every position lies in `[0, width] x [0, height]` after an update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    width: f32,
    height: f32,
}

impl Frame {
    /// Negative or NaN extents collapse to 0
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn center(&self) -> NVec2 {
        NVec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn clamp(&self, p: NVec2) -> NVec2 {
        clamp_to(p, NVec2::zeros(), NVec2::new(self.width, self.height))
    }

    pub fn contains(&self, p: NVec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with_lives(lives: &[u32]) -> (NodeArena, Vec<NodeId>) {
        let mut arena = NodeArena::new();
        let ids = lives
            .iter()
            .enumerate()
            .map(|(i, &life)| {
                let mut n = Node::person(format!("p{i}"));
                n.life = life;
                arena.insert(n)
            })
            .collect();
        (arena, ids)
    }

    #[test]
    fn insertion_order_is_fifo() {
        let (arena, ids) = arena_with_lives(&[10, 200, 50]);
        let mut people = People::new(PersonOrder::Insertion);
        for &id in &ids {
            people.push(id, &arena);
        }
        assert_eq!(people.into_sorted_ids(), ids);
    }

    #[test]
    fn life_ascending_polls_least_life_first() {
        let (arena, ids) = arena_with_lives(&[10, 200, 50, 10]);
        let mut people = People::new(PersonOrder::LifeAscending);
        for &id in &ids {
            people.push(id, &arena);
        }
        let polled: Vec<_> = std::iter::from_fn(|| people.pop()).collect();
        assert_eq!(polled, vec![ids[0], ids[3], ids[2], ids[1]]);
    }

    #[test]
    fn life_descending_polls_most_life_first() {
        let (arena, ids) = arena_with_lives(&[10, 200, 50]);
        let mut people = People::new(PersonOrder::LifeDescending);
        for &id in &ids {
            people.push(id, &arena);
        }
        assert_eq!(people.into_sorted_ids(), vec![ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn decay_saturates_at_zero() {
        let mut e = Edge::new(NodeId(0), NodeId(1), 1);
        e.life = 3;
        assert!(e.decay());
        assert_eq!(e.life, 1);
        assert!(!e.decay());
        assert_eq!(e.life, 0);
        assert!(!e.decay());
        assert_eq!(e.life, 0);
    }

    #[test]
    fn freshen_restores_life() {
        let mut n = Node::file("a.rs");
        n.life = 1;
        n.freshen();
        assert_eq!(n.life, n.life_init);
    }

    #[test]
    fn frame_rejects_negative_extent() {
        let f = Frame::new(-10.0, 20.0);
        assert_eq!(f.width(), 0.0);
        assert_eq!(f.clamp(NVec2::new(5.0, 30.0)), NVec2::new(0.0, 20.0));
    }
}
