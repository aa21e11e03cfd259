//! Lazily materialized neighbours for one point-to-point query on the dual.
//!
//! A query starts at a base node `s` and ends at a base node `t`, but dual
//! nodes are base *arcs*.  Two synthetic anchor ids stand in for the
//! endpoints:
//!
//! ```text
//! source anchor ──0──▶ dual(s → x)  for every arc leaving s classified Right
//! dual(y → t)   ──w──▶ target anchor for every arc entering t whose arrival
//!                                      (t → y) is classified Left
//! ```
//!
//! `w` is the arriving arc's weight times `dilation`, times
//! `non_octilinear_malus` when the arc is not aligned to a multiple of 45°.
//! Every other step is an ordinary dual arc.  Nothing is inserted into the
//! dual graph, so one [`DualGraph`] serves any number of queries.

use log::{debug, warn};
use rustc_hash::FxHashSet;

use iso_core::geo::is_octilinear;
use iso_core::{ArcId, IsoConfig, NodeId};
use iso_graph::{ArcWeight, GeoGraph};

use crate::overlay::{OverlayGraph, Side, SplitReference};
use crate::{DualError, DualGraph, DualResult, NeighborProvider};

// ── Anchors ───────────────────────────────────────────────────────────────────

/// Synthetic node ids for the query endpoints.  Both must lie outside the
/// dual graph and differ from each other.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Anchors {
    pub source: NodeId,
    pub target: NodeId,
}

impl Anchors {
    /// The first two ids past the dual graph's last node.
    pub fn past_end(dual: &DualGraph) -> Self {
        let n = dual.node_count();
        Self { source: NodeId::from_index(n), target: NodeId::from_index(n + 1) }
    }

    fn check(self, dual: &DualGraph) -> DualResult<Self> {
        for anchor in [self.source, self.target] {
            if !anchor.is_valid() || anchor.index() < dual.node_count() {
                return Err(DualError::AnchorCollision(anchor));
            }
        }
        if self.source == self.target {
            return Err(DualError::AnchorCollision(self.target));
        }
        Ok(self)
    }
}

// ── LazyDualNeighbors ─────────────────────────────────────────────────────────

/// [`NeighborProvider`] over a dual graph augmented with query anchors.
pub struct LazyDualNeighbors<'a, A> {
    base:     &'a GeoGraph<A>,
    dual:     &'a DualGraph,
    anchors:  Anchors,
    config:   IsoConfig,
    /// Dual nodes reachable from the source anchor, ascending.
    entries:  Vec<NodeId>,
    /// Dual nodes connected to the target anchor.
    exits:    FxHashSet<NodeId>,
    withheld: usize,
}

impl<'a, A: ArcWeight> LazyDualNeighbors<'a, A> {
    /// Prepare a query from base node `source` to base node `target`.
    ///
    /// `dual` must be the dual of `base`.  The overlay must hold a split node
    /// at both endpoint positions.
    pub fn new(
        base: &'a GeoGraph<A>,
        dual: &'a DualGraph,
        overlay: &OverlayGraph,
        source: NodeId,
        target: NodeId,
        anchors: Anchors,
        config: &IsoConfig,
    ) -> DualResult<Self> {
        config.validate()?;
        let anchors = anchors.check(dual)?;
        let at_source = SplitReference::locate(overlay, *base.node(source), config)?;
        let at_target = SplitReference::locate(overlay, *base.node(target), config)?;

        let mut withheld = 0usize;
        let mut entries = Vec::new();
        for &arc in base.out_arcs(source) {
            match at_source.classify(*base.node(base.target(arc))) {
                Side::Right => entries.extend(dual.identifier.dual_node(arc)),
                Side::Left => {}
                Side::Invalid => {
                    warn!("departure along {arc} is collinear with the overlay at {}", at_source.at());
                    withheld += 1;
                }
            }
        }
        entries.sort_unstable();
        entries.dedup();

        let mut exits = FxHashSet::default();
        for &arc in base.in_arcs(target) {
            // Arrival direction points from the target back along the arc.
            match at_target.classify(*base.node(base.source(arc))) {
                Side::Left => exits.extend(dual.identifier.dual_node(arc)),
                Side::Right => {}
                Side::Invalid => {
                    warn!("arrival along {arc} is collinear with the overlay at {}", at_target.at());
                    withheld += 1;
                }
            }
        }

        debug!(
            "query {source} -> {target}: {} entry arcs, {} exit arcs, {withheld} withheld",
            entries.len(),
            exits.len(),
        );
        Ok(Self { base, dual, anchors, config: config.clone(), entries, exits, withheld })
    }

    #[inline]
    pub fn anchors(&self) -> Anchors {
        self.anchors
    }

    /// Candidate arcs dropped because their classification was `Invalid`.
    #[inline]
    pub fn withheld(&self) -> usize {
        self.withheld
    }

    /// Cost of stepping from the dual node of `arc` into the target anchor.
    fn exit_cost(&self, arc: ArcId) -> f64 {
        let malus = if is_octilinear(self.base.arc_bearing(arc), self.config.octilinear_tolerance_deg) {
            1.0
        } else {
            self.config.non_octilinear_malus
        };
        self.base.arc(arc).weight() * self.config.dilation * malus
    }
}

impl<A: ArcWeight> NeighborProvider for LazyDualNeighbors<'_, A> {
    fn node_bound(&self) -> usize {
        self.dual
            .node_count()
            .max(self.anchors.source.index() + 1)
            .max(self.anchors.target.index() + 1)
    }

    fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        if node == self.anchors.source {
            return self.entries.clone();
        }
        let mut out = self.dual.graph.neighbors(node);
        if self.exits.contains(&node) {
            out.push(self.anchors.target);
        }
        out
    }

    fn cost(&self, from: NodeId, to: NodeId) -> Option<f64> {
        if from == self.anchors.source {
            return self.entries.binary_search(&to).is_ok().then_some(0.0);
        }
        if to == self.anchors.target {
            if !self.exits.contains(&from) {
                return None;
            }
            return self.dual.identifier.origin_arc(from).map(|arc| self.exit_cost(arc));
        }
        self.dual.graph.cost(from, to)
    }
}
