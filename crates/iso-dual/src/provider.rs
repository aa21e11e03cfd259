//! Neighbour/cost capability consumed by the router.

use iso_core::NodeId;
use iso_graph::{ArcWeight, DirectedGraph};

use crate::DualGraph;

/// On-demand adjacency with arc costs.
///
/// Node ids handed out by `neighbors` must stay below `node_bound`.
pub trait NeighborProvider {
    /// Exclusive upper bound on node ids this provider can return.
    fn node_bound(&self) -> usize;

    /// Distinct successors of `node`.  Unknown nodes have none.
    fn neighbors(&self, node: NodeId) -> Vec<NodeId>;

    /// Cost of stepping `from → to`, `None` if they are not adjacent.
    fn cost(&self, from: NodeId, to: NodeId) -> Option<f64>;
}

/// Any weighted graph is a provider; parallel arcs cost their minimum weight.
impl<N, A: ArcWeight> NeighborProvider for DirectedGraph<N, A> {
    #[inline]
    fn node_bound(&self) -> usize {
        self.node_count()
    }

    fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        if !self.contains_node(node) {
            return Vec::new();
        }
        let mut out: Vec<NodeId> = self.out_arcs(node).iter().map(|&a| self.target(a)).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    fn cost(&self, from: NodeId, to: NodeId) -> Option<f64> {
        if !self.contains_node(from) {
            return None;
        }
        self.out_arcs(from)
            .iter()
            .filter(|&&a| self.target(a) == to)
            .map(|&a| self.arc(a).weight())
            .min_by(f64::total_cmp)
    }
}

impl NeighborProvider for DualGraph {
    #[inline]
    fn node_bound(&self) -> usize {
        self.graph.node_bound()
    }

    #[inline]
    fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        self.graph.neighbors(node)
    }

    #[inline]
    fn cost(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.graph.cost(from, to)
    }
}
