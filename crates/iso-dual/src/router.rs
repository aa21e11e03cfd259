//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The router only sees a [`NeighborProvider`], so the same code searches a
//! plain weighted graph, a full [`DualGraph`](crate::DualGraph), or a
//! [`LazyDualNeighbors`](crate::LazyDualNeighbors) query.  Implement
//! [`Router`] to swap in A* or a bidirectional search.
//!
//! # Cost units
//!
//! Costs are whatever the provider returns, summed as `f64`.  They must be
//! non-negative.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use log::debug;

use iso_core::{ArcId, NodeId};

use crate::{DualError, DualIdentifier, DualResult, NeighborProvider};

// ── DualRoute ─────────────────────────────────────────────────────────────────

/// The result of a routing query: the visited nodes in order and the total
/// cost.
#[derive(Debug, Clone, PartialEq)]
pub struct DualRoute {
    /// Nodes from source to destination, both included.
    pub nodes: Vec<NodeId>,
    pub total_cost: f64,
}

impl DualRoute {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Base-graph arcs behind the dual nodes of this route.  Anchors and
    /// other ids without an origin arc are skipped.
    pub fn base_arcs(&self, identifier: &DualIdentifier) -> Vec<ArcId> {
        self.nodes.iter().filter_map(|&n| identifier.origin_arc(n)).collect()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
pub trait Router {
    /// Cheapest route from `from` to `to`.
    ///
    /// `from == to` is a trivial route, not an error.  Unreachable targets
    /// give [`DualError::NoRoute`].
    fn route<P>(&self, provider: &P, from: NodeId, to: NodeId) -> DualResult<DualRoute>
    where
        P: NeighborProvider + ?Sized;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra over a [`NeighborProvider`].
///
/// Ties in cost are broken by node id, so results are deterministic.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route<P>(&self, provider: &P, from: NodeId, to: NodeId) -> DualResult<DualRoute>
    where
        P: NeighborProvider + ?Sized,
    {
        if from == to {
            return Ok(DualRoute { nodes: vec![from], total_cost: 0.0 });
        }
        let mut search = Search::new(provider.node_bound(), from);
        while let Some((cost, node)) = search.pop() {
            if node == to {
                return Ok(DualRoute { nodes: search.path_to(to), total_cost: cost });
            }
            search.relax(provider, node, cost, f64::INFINITY);
        }
        Err(DualError::NoRoute { from, to })
    }
}

impl DijkstraRouter {
    /// Every node whose cheapest cost from `from` is at most `budget`, in
    /// settle order (non-decreasing cost), `from` first at cost `0`.
    pub fn reachable_within<P>(&self, provider: &P, from: NodeId, budget: f64) -> Vec<(NodeId, f64)>
    where
        P: NeighborProvider + ?Sized,
    {
        let mut settled = Vec::new();
        if from.index() >= provider.node_bound() || budget < 0.0 {
            return settled;
        }
        let mut search = Search::new(provider.node_bound(), from);
        while let Some((cost, node)) = search.pop() {
            settled.push((node, cost));
            search.relax(provider, node, cost, budget);
        }
        debug!("{} nodes within {budget} of {from}", settled.len());
        settled
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// `f64` with the IEEE total order so it can sit in a heap.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

struct Search {
    // dist[v] = best known cost to reach v.
    dist: Vec<f64>,
    // prev[v] = node that reached v; NodeId::INVALID for unreached nodes.
    prev: Vec<NodeId>,
    // Min-heap via Reverse; NodeId breaks ties deterministically.
    heap: BinaryHeap<Reverse<(Cost, NodeId)>>,
}

impl Search {
    fn new(bound: usize, from: NodeId) -> Self {
        let bound = bound.max(from.index() + 1);
        let mut dist = vec![f64::INFINITY; bound];
        dist[from.index()] = 0.0;
        let mut heap = BinaryHeap::new();
        heap.push(Reverse((Cost(0.0), from)));
        Self { dist, prev: vec![NodeId::INVALID; bound], heap }
    }

    /// Next settled node, skipping stale heap entries.
    fn pop(&mut self) -> Option<(f64, NodeId)> {
        while let Some(Reverse((Cost(cost), node))) = self.heap.pop() {
            // Entries are only pushed on strict improvement, so equality means fresh.
            if cost <= self.dist[node.index()] {
                return Some((cost, node));
            }
        }
        None
    }

    fn relax<P>(&mut self, provider: &P, node: NodeId, cost: f64, budget: f64)
    where
        P: NeighborProvider + ?Sized,
    {
        for next in provider.neighbors(node) {
            let Some(step) = provider.cost(node, next) else {
                continue;
            };
            let new_cost = cost + step;
            if new_cost <= budget && new_cost < self.dist[next.index()] {
                self.dist[next.index()] = new_cost;
                self.prev[next.index()] = node;
                self.heap.push(Reverse((Cost(new_cost), next)));
            }
        }
    }

    fn path_to(&self, to: NodeId) -> Vec<NodeId> {
        let mut nodes = vec![to];
        let mut cur = to;
        while self.prev[cur.index()] != NodeId::INVALID {
            cur = self.prev[cur.index()];
            nodes.push(cur);
        }
        nodes.reverse();
        nodes
    }
}
