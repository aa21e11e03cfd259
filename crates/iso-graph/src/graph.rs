//! Arena-backed directed graph.
//!
//! # Data layout
//!
//! Nodes and arcs live in two `Vec` stores addressed by [`NodeId`] and
//! [`ArcId`].  Each node owns the ids of its outgoing and incoming arcs; each
//! arc stores its endpoints and, optionally, the id of its **twin** (the arc
//! running the same undirected edge the other way).  Twins are plain ids, so
//! the mutual reference never becomes an ownership cycle.
//!
//! ```text
//! nodes[n] = { payload, out_arcs: [a0, a3], in_arcs: [a1] }
//! arcs[a0] = { source: n, target: m, twin: Some(a1), payload }
//! ```
//!
//! # Geometric deduplication
//!
//! When a node payload reports a position (see [`NodePayload`]), the graph
//! keeps an exact-coordinate index.  Adding a second node at an occupied
//! coordinate does not insert anything; it returns
//! [`NodeSlot::Occupied`] with the existing id.

use std::cmp::Ordering;

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use iso_core::{ArcId, NodeId, Point, PointKey};

// ── Payload traits ────────────────────────────────────────────────────────────

/// Node payloads that may carry a position.
///
/// Payloads returning `Some` are deduplicated by exact coordinate; payloads
/// returning `None` (the default) never are.
pub trait NodePayload {
    fn position(&self) -> Option<Point> {
        None
    }
}

impl NodePayload for Point {
    #[inline]
    fn position(&self) -> Option<Point> {
        Some(*self)
    }
}

impl NodePayload for () {}
impl NodePayload for u32 {}
impl NodePayload for usize {}
impl NodePayload for &'static str {}

/// Arc payloads that expose a traversal weight.
pub trait ArcWeight {
    fn weight(&self) -> f64;
}

impl ArcWeight for f64 {
    #[inline]
    fn weight(&self) -> f64 {
        *self
    }
}

// ── Results ───────────────────────────────────────────────────────────────────

/// Outcome of [`DirectedGraph::add_node`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeSlot {
    /// A new node was created.
    Added(NodeId),
    /// The coordinate was taken; nothing was inserted.
    Occupied(NodeId),
}

impl NodeSlot {
    /// The new or pre-existing node id.
    #[inline]
    pub fn id(self) -> NodeId {
        match self {
            NodeSlot::Added(id) | NodeSlot::Occupied(id) => id,
        }
    }

    #[inline]
    pub fn is_added(self) -> bool {
        matches!(self, NodeSlot::Added(_))
    }
}

/// Old-id → new-id maps produced by [`DirectedGraph::remove_nodes`].
#[derive(Clone, Debug, Default)]
pub struct Compaction {
    node_map: Vec<Option<NodeId>>,
    arc_map:  Vec<Option<ArcId>>,
}

impl Compaction {
    /// New id of a node that existed before compaction; `None` if removed.
    pub fn node(&self, old: NodeId) -> Option<NodeId> {
        self.node_map.get(old.index()).copied().flatten()
    }

    /// New id of an arc that existed before compaction; `None` if dropped.
    pub fn arc(&self, old: ArcId) -> Option<ArcId> {
        self.arc_map.get(old.index()).copied().flatten()
    }

    pub fn removed_nodes(&self) -> usize {
        self.node_map.iter().filter(|m| m.is_none()).count()
    }

    pub fn dropped_arcs(&self) -> usize {
        self.arc_map.iter().filter(|m| m.is_none()).count()
    }
}

/// Cyclic direction through a node's sorted outgoing arcs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rotation {
    /// Next arc in ascending comparator order.
    Ccw,
    /// Next arc in descending comparator order.
    Cw,
}

// ── Storage ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct NodeEntry<N> {
    payload:  N,
    out_arcs: Vec<ArcId>,
    in_arcs:  Vec<ArcId>,
}

#[derive(Clone, Debug)]
struct ArcEntry<A> {
    source:  NodeId,
    target:  NodeId,
    twin:    Option<ArcId>,
    payload: A,
}

// ── DirectedGraph ─────────────────────────────────────────────────────────────

/// Directed multigraph with optional twin pairing.
///
/// Parallel arcs between the same pair are allowed; callers needing at most
/// one arc per pair check [`first_arc_to`](Self::first_arc_to) before adding.
#[derive(Clone, Debug)]
pub struct DirectedGraph<N, A> {
    nodes:       Vec<NodeEntry<N>>,
    arcs:        Vec<ArcEntry<A>>,
    by_position: FxHashMap<PointKey, NodeId>,
}

impl<N, A> DirectedGraph<N, A> {
    pub fn new() -> Self {
        Self {
            nodes:       Vec::new(),
            arcs:        Vec::new(),
            by_position: FxHashMap::default(),
        }
    }

    pub fn with_capacity(nodes: usize, arcs: usize) -> Self {
        Self {
            nodes:       Vec::with_capacity(nodes),
            arcs:        Vec::with_capacity(arcs),
            by_position: FxHashMap::default(),
        }
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Add a directed arc `source → target` without a twin.
    pub fn add_arc(&mut self, source: NodeId, target: NodeId, payload: A) -> ArcId {
        let id = ArcId::from_index(self.arcs.len());
        self.arcs.push(ArcEntry { source, target, twin: None, payload });
        self.nodes[source.index()].out_arcs.push(id);
        self.nodes[target.index()].in_arcs.push(id);
        id
    }

    /// Add `u → v` and `v → u` and pair them as twins.
    pub fn add_double_arc(&mut self, u: NodeId, v: NodeId, payload: A) -> (ArcId, ArcId)
    where
        A: Clone,
    {
        let forward = self.add_arc(u, v, payload.clone());
        let backward = self.add_arc(v, u, payload);
        self.link_twins(forward, backward);
        (forward, backward)
    }

    /// Pair two existing arcs as twins.
    ///
    /// # Panics
    /// Panics in debug builds if the arcs do not run opposite ways.
    pub fn link_twins(&mut self, a: ArcId, b: ArcId) {
        debug_assert_eq!(self.arcs[a.index()].source, self.arcs[b.index()].target);
        debug_assert_eq!(self.arcs[a.index()].target, self.arcs[b.index()].source);
        self.arcs[a.index()].twin = Some(b);
        self.arcs[b.index()].twin = Some(a);
    }

    /// Order every node's outgoing arc list by `cmp`.
    ///
    /// After sorting, [`next_out_arc`](Self::next_out_arc) walks the fan in
    /// ascending (`Ccw`) or descending (`Cw`) order.  Incoming lists keep
    /// insertion order: an incoming arc's travel direction points into the
    /// node, so a bearing comparator would not give an angular fan there.
    pub fn sort_adjacency_by<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&Self, ArcId, ArcId) -> Ordering,
    {
        for i in 0..self.nodes.len() {
            let mut out = std::mem::take(&mut self.nodes[i].out_arcs);
            out.sort_by(|&a, &b| cmp(&*self, a, b));
            self.nodes[i].out_arcs = out;
        }
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::from_index)
    }

    pub fn arc_ids(&self) -> impl Iterator<Item = ArcId> + '_ {
        (0..self.arcs.len()).map(ArcId::from_index)
    }

    #[inline]
    pub fn node(&self, node: NodeId) -> &N {
        &self.nodes[node.index()].payload
    }

    #[inline]
    pub fn arc(&self, arc: ArcId) -> &A {
        &self.arcs[arc.index()].payload
    }

    #[inline]
    pub fn source(&self, arc: ArcId) -> NodeId {
        self.arcs[arc.index()].source
    }

    #[inline]
    pub fn target(&self, arc: ArcId) -> NodeId {
        self.arcs[arc.index()].target
    }

    #[inline]
    pub fn twin(&self, arc: ArcId) -> Option<ArcId> {
        self.arcs[arc.index()].twin
    }

    #[inline]
    pub fn out_arcs(&self, node: NodeId) -> &[ArcId] {
        &self.nodes[node.index()].out_arcs
    }

    #[inline]
    pub fn in_arcs(&self, node: NodeId) -> &[ArcId] {
        &self.nodes[node.index()].in_arcs
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        self.nodes[node.index()].out_arcs.len()
    }

    /// Node sitting exactly at `p`.
    pub fn node_at(&self, p: Point) -> Option<NodeId> {
        self.by_position.get(&p.key()).copied()
    }

    /// First outgoing arc of `from` that ends at `to` (linear scan).
    pub fn first_arc_to(&self, from: NodeId, to: NodeId) -> Option<ArcId> {
        self.nodes[from.index()]
            .out_arcs
            .iter()
            .copied()
            .find(|&a| self.arcs[a.index()].target == to)
    }

    /// Cyclic neighbour of `arc` among its source's outgoing arcs.
    ///
    /// Returns `arc` itself when it is the only outgoing arc.
    pub fn next_out_arc(&self, arc: ArcId, rotation: Rotation) -> Option<ArcId> {
        let fan = self.out_arcs(self.source(arc));
        let pos = fan.iter().position(|&a| a == arc)?;
        let next = match rotation {
            Rotation::Ccw => (pos + 1) % fan.len(),
            Rotation::Cw => (pos + fan.len() - 1) % fan.len(),
        };
        Some(fan[next])
    }
}

impl<N, A> Default for DirectedGraph<N, A> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Payload-aware operations ──────────────────────────────────────────────────

impl<N: NodePayload, A> DirectedGraph<N, A> {
    /// Insert a node, or return the node already sitting at the payload's
    /// coordinate.
    pub fn add_node(&mut self, payload: N) -> NodeSlot {
        let key = payload.position().map(Point::key);
        if let Some(key) = key {
            if let Some(&existing) = self.by_position.get(&key) {
                return NodeSlot::Occupied(existing);
            }
        }
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(NodeEntry { payload, out_arcs: Vec::new(), in_arcs: Vec::new() });
        if let Some(key) = key {
            self.by_position.insert(key, id);
        }
        NodeSlot::Added(id)
    }

    /// Remove `doomed` nodes and every arc touching them, then compact node
    /// and arc ids in their original relative order.
    ///
    /// Twin links to dropped arcs are cleared.  The returned [`Compaction`]
    /// translates ids held by the caller.
    pub fn remove_nodes(&mut self, doomed: &FxHashSet<NodeId>) -> Compaction {
        let mut node_map = Vec::with_capacity(self.nodes.len());
        let mut next = 0usize;
        for i in 0..self.nodes.len() {
            if doomed.contains(&NodeId::from_index(i)) {
                node_map.push(None);
            } else {
                node_map.push(Some(NodeId::from_index(next)));
                next += 1;
            }
        }

        let mut arc_map = Vec::with_capacity(self.arcs.len());
        let mut next = 0usize;
        for arc in &self.arcs {
            let kept = node_map[arc.source.index()].is_some() && node_map[arc.target.index()].is_some();
            if kept {
                arc_map.push(Some(ArcId::from_index(next)));
                next += 1;
            } else {
                arc_map.push(None);
            }
        }

        let old_arcs = std::mem::take(&mut self.arcs);
        self.arcs = old_arcs
            .into_iter()
            .enumerate()
            .filter(|(i, _)| arc_map[*i].is_some())
            .map(|(_, arc)| ArcEntry {
                source:  node_map[arc.source.index()].unwrap_or(NodeId::INVALID),
                target:  node_map[arc.target.index()].unwrap_or(NodeId::INVALID),
                twin:    arc.twin.and_then(|t| arc_map[t.index()]),
                payload: arc.payload,
            })
            .collect();

        let remap = |list: Vec<ArcId>| -> Vec<ArcId> {
            list.into_iter().filter_map(|a| arc_map[a.index()]).collect()
        };
        let old_nodes = std::mem::take(&mut self.nodes);
        self.nodes = old_nodes
            .into_iter()
            .enumerate()
            .filter(|(i, _)| node_map[*i].is_some())
            .map(|(_, node)| NodeEntry {
                payload:  node.payload,
                out_arcs: remap(node.out_arcs),
                in_arcs:  remap(node.in_arcs),
            })
            .collect();

        self.by_position.clear();
        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(p) = node.payload.position() {
                self.by_position.insert(p.key(), NodeId::from_index(i));
            }
        }

        let compaction = Compaction { node_map, arc_map };
        debug!(
            "removed {} nodes and {} arcs; {} nodes / {} arcs remain",
            compaction.removed_nodes(),
            compaction.dropped_arcs(),
            self.nodes.len(),
            self.arcs.len(),
        );
        compaction
    }
}

// ── Geometric helpers ─────────────────────────────────────────────────────────

impl<A> DirectedGraph<Point, A> {
    /// `(source position, target position)` of an arc.
    #[inline]
    pub fn segment(&self, arc: ArcId) -> (Point, Point) {
        let a = &self.arcs[arc.index()];
        (self.nodes[a.source.index()].payload, self.nodes[a.target.index()].payload)
    }

    /// Euclidean length of an arc.
    pub fn arc_length(&self, arc: ArcId) -> f64 {
        let (p, q) = self.segment(arc);
        p.distance(q)
    }

    /// Direction of an arc in degrees, counter-clockwise from east.
    pub fn arc_bearing(&self, arc: ArcId) -> f64 {
        let (p, q) = self.segment(arc);
        p.bearing_deg(q)
    }

    pub fn arc_midpoint(&self, arc: ArcId) -> Point {
        let (p, q) = self.segment(arc);
        p.midpoint(q)
    }
}
