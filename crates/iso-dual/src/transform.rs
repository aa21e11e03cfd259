//! Linear dual transform.
//!
//! Every base arc becomes a dual node; every legal turn `incoming → outgoing`
//! at a base node becomes a dual arc weighted by the [`TurnCost`].  A route in
//! the dual is therefore a sequence of base arcs whose consecutive pairs are
//! allowed turns.
//!
//! # Placement
//!
//! Dual nodes live in a geometric graph, so two arcs whose [`DualPlacement`]
//! coincides (always the case for twin arcs under [`Midpoint`]) would collapse
//! into one node.  The transform retries the insertion `k = 1, 2, …` times,
//! shifting the point by `k * perturb_step` along the arc's own direction,
//! and gives up with [`DualError::PositionExhausted`] after
//! `max_perturbations` retries.

use log::{log, trace};

use iso_core::{ArcId, IsoConfig, NodeId, Point};
use iso_graph::{ArcWeight, GeoGraph, NodeSlot};

use crate::{DualError, DualResult};

// ── Capabilities ──────────────────────────────────────────────────────────────

/// Where the dual node of a base arc is placed.
pub trait DualPlacement<A> {
    fn place(&self, graph: &GeoGraph<A>, arc: ArcId) -> Point;
}

/// Default placement: the arc's midpoint.
#[derive(Clone, Copy, Debug, Default)]
pub struct Midpoint;

impl<A> DualPlacement<A> for Midpoint {
    #[inline]
    fn place(&self, graph: &GeoGraph<A>, arc: ArcId) -> Point {
        graph.arc_midpoint(arc)
    }
}

impl<A, F> DualPlacement<A> for F
where
    F: Fn(&GeoGraph<A>, ArcId) -> Point,
{
    #[inline]
    fn place(&self, graph: &GeoGraph<A>, arc: ArcId) -> Point {
        self(graph, arc)
    }
}

/// Cost of turning from `incoming` into `outgoing` at their shared node.
///
/// `None` forbids the turn: no dual arc is created.  `is_twin_pair` is `true`
/// when `outgoing` is the twin of `incoming` (a U-turn).
pub trait TurnCost<A> {
    fn cost(
        &self,
        graph: &GeoGraph<A>,
        incoming: ArcId,
        outgoing: ArcId,
        is_twin_pair: bool,
    ) -> Option<f64>;
}

/// Every turn costs the weight of the incoming arc; U-turns are forbidden.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForbidUTurns;

impl<A: ArcWeight> TurnCost<A> for ForbidUTurns {
    #[inline]
    fn cost(&self, graph: &GeoGraph<A>, incoming: ArcId, _outgoing: ArcId, is_twin_pair: bool) -> Option<f64> {
        (!is_twin_pair).then(|| graph.arc(incoming).weight())
    }
}

impl<A, F> TurnCost<A> for F
where
    F: Fn(&GeoGraph<A>, ArcId, ArcId, bool) -> Option<f64>,
{
    #[inline]
    fn cost(&self, graph: &GeoGraph<A>, incoming: ArcId, outgoing: ArcId, is_twin_pair: bool) -> Option<f64> {
        self(graph, incoming, outgoing, is_twin_pair)
    }
}

// ── DualIdentifier ────────────────────────────────────────────────────────────

/// Bijection between base arcs and dual nodes.
///
/// Dual node ids are assigned in base-arc order, but callers should go through
/// the lookups rather than rely on that.
#[derive(Clone, Debug, Default)]
pub struct DualIdentifier {
    arc_to_node: Vec<NodeId>,
    node_to_arc: Vec<ArcId>,
    twin_of:     Vec<Option<NodeId>>,
}

impl DualIdentifier {
    /// Base arc represented by `node`.  `None` for ids outside the dual graph,
    /// such as query anchors.
    #[inline]
    pub fn origin_arc(&self, node: NodeId) -> Option<ArcId> {
        self.node_to_arc.get(node.index()).copied()
    }

    /// Dual node representing base arc `arc`.
    #[inline]
    pub fn dual_node(&self, arc: ArcId) -> Option<NodeId> {
        self.arc_to_node.get(arc.index()).copied()
    }

    /// Dual node of the twin of `node`'s base arc, if that arc has a twin.
    #[inline]
    pub fn twin_dual_node(&self, node: NodeId) -> Option<NodeId> {
        self.twin_of.get(node.index()).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.node_to_arc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_to_arc.is_empty()
    }
}

// ── DualGraph ─────────────────────────────────────────────────────────────────

/// Output of [`LinearDualTransform::transform`].
#[derive(Clone, Debug)]
pub struct DualGraph {
    /// Dual graph; arc payload is the turn cost.
    pub graph: GeoGraph<f64>,
    pub identifier: DualIdentifier,
}

impl DualGraph {
    #[inline]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

// ── LinearDualTransform ───────────────────────────────────────────────────────

/// Builds the linear dual of a geometric graph.
///
/// # Example
///
/// ```
/// use iso_core::{IsoConfig, Point};
/// use iso_graph::GeoGraph;
/// use iso_dual::LinearDualTransform;
///
/// let mut g: GeoGraph<f64> = GeoGraph::new();
/// let a = g.add_node(Point::new(0.0, 0.0)).id();
/// let b = g.add_node(Point::new(1.0, 0.0)).id();
/// let c = g.add_node(Point::new(2.0, 0.0)).id();
/// g.add_double_arc(a, b, 1.0);
/// g.add_double_arc(b, c, 1.0);
///
/// let dual = LinearDualTransform::new(&IsoConfig::default()).transform(&g).unwrap();
/// assert_eq!(dual.graph.node_count(), 4);
/// assert_eq!(dual.graph.arc_count(), 2); // straight on, both ways
/// ```
pub struct LinearDualTransform<P = Midpoint, T = ForbidUTurns> {
    config:    IsoConfig,
    placement: P,
    turn_cost: T,
}

impl LinearDualTransform {
    pub fn new(config: &IsoConfig) -> Self {
        Self { config: config.clone(), placement: Midpoint, turn_cost: ForbidUTurns }
    }
}

impl<P, T> LinearDualTransform<P, T> {
    pub fn with_placement<Q>(self, placement: Q) -> LinearDualTransform<Q, T> {
        LinearDualTransform { config: self.config, placement, turn_cost: self.turn_cost }
    }

    pub fn with_turn_cost<U>(self, turn_cost: U) -> LinearDualTransform<P, U> {
        LinearDualTransform { config: self.config, placement: self.placement, turn_cost }
    }

    /// Build the dual of `graph`.
    pub fn transform<A>(&self, graph: &GeoGraph<A>) -> DualResult<DualGraph>
    where
        P: DualPlacement<A>,
        T: TurnCost<A>,
    {
        self.config.validate()?;

        let mut dual: GeoGraph<f64> = GeoGraph::with_capacity(graph.arc_count(), graph.arc_count() * 2);
        let mut arc_to_node = Vec::with_capacity(graph.arc_count());
        let mut node_to_arc = vec![ArcId::INVALID; graph.arc_count()];
        let mut perturbed = 0usize;

        for arc in graph.arc_ids() {
            let (node, retries) = self.place(&mut dual, graph, arc)?;
            perturbed += usize::from(retries > 0);
            arc_to_node.push(node);
            node_to_arc[node.index()] = arc;
        }

        for node in graph.node_ids() {
            for &incoming in graph.in_arcs(node) {
                for &outgoing in graph.out_arcs(node) {
                    let is_twin_pair = graph.twin(incoming) == Some(outgoing);
                    if let Some(cost) = self.turn_cost.cost(graph, incoming, outgoing, is_twin_pair) {
                        dual.add_arc(arc_to_node[incoming.index()], arc_to_node[outgoing.index()], cost);
                    }
                }
            }
        }

        let twin_of = node_to_arc
            .iter()
            .map(|&arc| graph.twin(arc).map(|t| arc_to_node[t.index()]))
            .collect();

        log!(
            self.config.log_level(),
            "dual of {} nodes / {} arcs: {} dual nodes ({} perturbed), {} turns",
            graph.node_count(),
            graph.arc_count(),
            dual.node_count(),
            perturbed,
            dual.arc_count(),
        );

        Ok(DualGraph { graph: dual, identifier: DualIdentifier { arc_to_node, node_to_arc, twin_of } })
    }

    /// Insert the dual node of `arc`, perturbing on position conflicts.
    /// Returns the node and the number of retries used.
    fn place<A>(&self, dual: &mut GeoGraph<f64>, graph: &GeoGraph<A>, arc: ArcId) -> DualResult<(NodeId, u32)>
    where
        P: DualPlacement<A>,
    {
        let origin = self.placement.place(graph, arc);
        let (from, to) = graph.segment(arc);
        for k in 0..=self.config.max_perturbations {
            let p = match k {
                0 => origin,
                _ => origin.nudged_along(from, to, f64::from(k) * self.config.perturb_step),
            };
            if let NodeSlot::Added(node) = dual.add_node(p) {
                if k > 0 {
                    trace!("dual node of {arc} placed after {k} perturbations");
                }
                return Ok((node, k));
            }
        }
        Err(DualError::PositionExhausted { arc, attempts: self.config.max_perturbations + 1 })
    }
}
