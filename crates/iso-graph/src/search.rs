//! Generic graph traversal and connected components.
//!
//! # Run stamps
//!
//! [`GraphSearch`] keeps one `u32` stamp per node.  Every traversal bumps a
//! run counter and treats a node as discovered only if its stamp equals the
//! current run, so consecutive runs never clear the arrays.  The arrays are
//! wiped once, when the counter is about to wrap.
//!
//! # Pluggability
//!
//! The frontier decides the order: [`Fifo`] gives breadth-first search,
//! [`Lifo`] depth-first.  A [`SearchVisitor`] gates which arcs are followed and
//! observes discoveries and settlements; [`NoopVisitor`] follows everything.

use std::collections::VecDeque;

use iso_core::{ArcId, NodeId};

use crate::graph::DirectedGraph;

// ── Frontier ──────────────────────────────────────────────────────────────────

/// Queue capability driving the traversal order.
pub trait Frontier: Default {
    fn add(&mut self, node: NodeId);
    fn next(&mut self) -> Option<NodeId>;
    fn has_next(&self) -> bool;
}

/// First-in first-out frontier (breadth-first).
#[derive(Default, Debug)]
pub struct Fifo(VecDeque<NodeId>);

impl Frontier for Fifo {
    #[inline]
    fn add(&mut self, node: NodeId) {
        self.0.push_back(node);
    }
    #[inline]
    fn next(&mut self) -> Option<NodeId> {
        self.0.pop_front()
    }
    #[inline]
    fn has_next(&self) -> bool {
        !self.0.is_empty()
    }
}

/// Last-in first-out frontier (depth-first).
#[derive(Default, Debug)]
pub struct Lifo(Vec<NodeId>);

impl Frontier for Lifo {
    #[inline]
    fn add(&mut self, node: NodeId) {
        self.0.push(node);
    }
    #[inline]
    fn next(&mut self) -> Option<NodeId> {
        self.0.pop()
    }
    #[inline]
    fn has_next(&self) -> bool {
        !self.0.is_empty()
    }
}

// ── Visitor ───────────────────────────────────────────────────────────────────

/// Callbacks invoked by [`GraphSearch`].
///
/// All methods default to "follow everything, observe nothing", so
/// implementors override only what they need.
pub trait SearchVisitor<N, A> {
    /// Whether the traversal may follow `arc`.
    fn accept_arc(&mut self, _graph: &DirectedGraph<N, A>, _arc: ArcId) -> bool {
        true
    }

    /// Called once per node, when it leaves the frontier.
    fn settle_node(&mut self, _node: NodeId) {}

    /// Called once per node, when an arc first discovers it.  Not called for
    /// the start node.
    fn visit_neighbor(&mut self, _node: NodeId) {}
}

/// A [`SearchVisitor`] that follows every arc and records nothing.
pub struct NoopVisitor;

impl<N, A> SearchVisitor<N, A> for NoopVisitor {}

/// Forwards arc gating to an inner visitor and collects settled nodes.
struct Collect<'v, V> {
    inner:   &'v mut V,
    settled: Vec<NodeId>,
}

impl<N, A, V: SearchVisitor<N, A>> SearchVisitor<N, A> for Collect<'_, V> {
    fn accept_arc(&mut self, graph: &DirectedGraph<N, A>, arc: ArcId) -> bool {
        self.inner.accept_arc(graph, arc)
    }

    fn settle_node(&mut self, node: NodeId) {
        self.inner.settle_node(node);
        self.settled.push(node);
    }

    fn visit_neighbor(&mut self, node: NodeId) {
        self.inner.visit_neighbor(node);
    }
}

// ── GraphSearch ───────────────────────────────────────────────────────────────

/// Reusable traversal state.
///
/// Keep one instance per graph and call [`bfs`](Self::bfs),
/// [`dfs`](Self::dfs) or [`components`](Self::components) as often as needed.
#[derive(Debug, Default)]
pub struct GraphSearch {
    stamps:       Vec<u32>,
    predecessors: Vec<ArcId>,
    run:          u32,
}

impl GraphSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            stamps:       vec![0; nodes],
            predecessors: vec![ArcId::INVALID; nodes],
            run:          0,
        }
    }

    /// Search whose run counter starts at `run`, to exercise the wrap reset.
    #[cfg(test)]
    pub(crate) fn starting_at_run(run: u32) -> Self {
        Self { run, ..Self::default() }
    }

    /// Stamp of the most recent run; 0 before the first one.
    pub fn current_run(&self) -> u32 {
        self.run
    }

    /// Breadth-first traversal from `start`.
    pub fn bfs<N, A, V>(&mut self, graph: &DirectedGraph<N, A>, start: NodeId, visitor: &mut V)
    where
        V: SearchVisitor<N, A>,
    {
        self.traverse::<Fifo, N, A, V>(graph, start, visitor);
    }

    /// Depth-first traversal from `start`.
    pub fn dfs<N, A, V>(&mut self, graph: &DirectedGraph<N, A>, start: NodeId, visitor: &mut V)
    where
        V: SearchVisitor<N, A>,
    {
        self.traverse::<Lifo, N, A, V>(graph, start, visitor);
    }

    /// Traverse from `start` in the order imposed by frontier `Q`.
    pub fn traverse<Q, N, A, V>(&mut self, graph: &DirectedGraph<N, A>, start: NodeId, visitor: &mut V)
    where
        Q: Frontier,
        V: SearchVisitor<N, A>,
    {
        self.prepare(graph.node_count(), 1);
        self.run += 1;
        let floor = self.run;
        self.explore::<Q, N, A, V>(graph, start, floor, visitor);
    }

    /// Components reachable along outgoing arcs, ordered by seed id.
    ///
    /// Every node not yet claimed in this pass seeds a fresh breadth-first
    /// run; the nodes it settles form one component.  The result partitions
    /// the node set.  On graphs where every arc has a twin these are the
    /// connected components.
    pub fn components<N, A, V>(&mut self, graph: &DirectedGraph<N, A>, visitor: &mut V) -> Vec<Vec<NodeId>>
    where
        V: SearchVisitor<N, A>,
    {
        self.components_where(graph, visitor, |_| true)
    }

    /// Like [`components`](Self::components), but only nodes accepted by
    /// `start_filter` may seed a component.  Nodes reachable only from
    /// rejected seeds appear in no component.
    pub fn components_where<N, A, V, F>(
        &mut self,
        graph: &DirectedGraph<N, A>,
        visitor: &mut V,
        mut start_filter: F,
    ) -> Vec<Vec<NodeId>>
    where
        V: SearchVisitor<N, A>,
        F: FnMut(NodeId) -> bool,
    {
        let n = graph.node_count();
        self.prepare(n, n);
        let floor = self.run + 1;

        let mut components = Vec::new();
        for node in graph.node_ids() {
            if self.stamps[node.index()] >= floor || !start_filter(node) {
                continue;
            }
            self.run += 1;
            let mut collect = Collect { inner: &mut *visitor, settled: Vec::new() };
            self.explore::<Fifo, N, A, _>(graph, node, floor, &mut collect);
            components.push(collect.settled);
        }
        components
    }

    /// `true` if the latest run discovered `node`.
    pub fn is_visited(&self, node: NodeId) -> bool {
        self.run != 0 && self.stamps.get(node.index()) == Some(&self.run)
    }

    /// Arc through which the latest run discovered `node`.  `None` for the
    /// start node and for nodes the run never reached.
    pub fn predecessor(&self, node: NodeId) -> Option<ArcId> {
        if !self.is_visited(node) {
            return None;
        }
        let arc = self.predecessors[node.index()];
        arc.is_valid().then_some(arc)
    }

    /// Arcs from the latest run's start node to `node`, in travel order.
    pub fn path_to<N, A>(&self, graph: &DirectedGraph<N, A>, node: NodeId) -> Option<Vec<ArcId>> {
        if !self.is_visited(node) {
            return None;
        }
        let mut arcs = Vec::new();
        let mut cur = node;
        while let Some(arc) = self.predecessor(cur) {
            arcs.push(arc);
            cur = graph.source(arc);
        }
        arcs.reverse();
        Some(arcs)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Grow the arrays to `nodes` and make room for `runs` more runs.
    fn prepare(&mut self, nodes: usize, runs: usize) {
        if self.stamps.len() < nodes {
            self.stamps.resize(nodes, 0);
            self.predecessors.resize(nodes, ArcId::INVALID);
        }
        let headroom = (u32::MAX - self.run) as usize;
        if headroom <= runs {
            self.stamps.fill(0);
            self.run = 0;
        }
    }

    /// Core loop shared by all entry points.  A node counts as discovered
    /// when its stamp is at least `floor`.
    fn explore<Q, N, A, V>(&mut self, graph: &DirectedGraph<N, A>, start: NodeId, floor: u32, visitor: &mut V)
    where
        Q: Frontier,
        V: SearchVisitor<N, A>,
    {
        let run = self.run;
        let mut frontier = Q::default();
        self.stamps[start.index()] = run;
        self.predecessors[start.index()] = ArcId::INVALID;
        frontier.add(start);

        while frontier.has_next() {
            let Some(node) = frontier.next() else { break };
            visitor.settle_node(node);
            for &arc in graph.out_arcs(node) {
                if !visitor.accept_arc(graph, arc) {
                    continue;
                }
                let next = graph.target(arc);
                if self.stamps[next.index()] >= floor {
                    continue;
                }
                self.stamps[next.index()] = run;
                self.predecessors[next.index()] = arc;
                visitor.visit_neighbor(next);
                frontier.add(next);
            }
        }
    }
}
