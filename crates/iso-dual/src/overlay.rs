//! Overlay graph and the left/right direction classifier.
//!
//! An overlay is a small coloured graph drawn around a query endpoint.  At the
//! split node (the overlay node sitting exactly on the endpoint) two
//! reference directions are read off:
//!
//! | Reference     | Taken from                                           |
//! |---------------|------------------------------------------------------|
//! | `reachable`   | first incoming arc whose source is `Reachable`       |
//! | `unreachable` | first outgoing arc whose target is `Unreachable`     |
//!
//! A candidate direction is [`Side::Left`] when it lies strictly inside the
//! counter-clockwise wedge swept from `reachable` to `unreachable`, and
//! [`Side::Right`] when strictly outside.  Directions within
//! `direction_epsilon` degrees of either reference, zero-length directions,
//! and collapsed wedges are [`Side::Invalid`].

use iso_core::geo::ccw_sweep;
use iso_core::{IsoConfig, NodeId, Point};
use iso_graph::{DirectedGraph, NodePayload};

use crate::{DualError, DualResult};

// ── Overlay payloads ──────────────────────────────────────────────────────────

/// Colour of an overlay node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reachability {
    Reachable,
    Unreachable,
}

/// Overlay node payload.  Deduplicated by position like every geometric node.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayNode {
    pub position: Point,
    pub color:    Reachability,
}

impl OverlayNode {
    pub fn reachable(position: Point) -> Self {
        Self { position, color: Reachability::Reachable }
    }

    pub fn unreachable(position: Point) -> Self {
        Self { position, color: Reachability::Unreachable }
    }
}

impl NodePayload for OverlayNode {
    #[inline]
    fn position(&self) -> Option<Point> {
        Some(self.position)
    }
}

pub type OverlayGraph = DirectedGraph<OverlayNode, ()>;

// ── Side ──────────────────────────────────────────────────────────────────────

/// Outcome of classifying a direction against a [`SplitReference`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Side {
    Left = -1,
    Invalid = 0,
    Right = 1,
}

impl Side {
    /// `-1`, `0` or `+1`.
    #[inline]
    pub fn signum(self) -> i8 {
        self as i8
    }
}

// ── SplitReference ────────────────────────────────────────────────────────────

/// Reference directions read from the overlay at one split point.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitReference {
    at:          Point,
    /// Bearing from the split point towards the reachable neighbour.
    reachable:   f64,
    /// Bearing from the split point towards the unreachable neighbour.
    unreachable: f64,
    epsilon:     f64,
}

impl SplitReference {
    /// Read the references at `at`.
    ///
    /// Fails with [`DualError::MissingSplitNode`] if the overlay has no node
    /// at `at`, and with [`DualError::MalformedOverlay`] if either reference
    /// arc is absent.
    pub fn locate(overlay: &OverlayGraph, at: Point, config: &IsoConfig) -> DualResult<Self> {
        let node = overlay.node_at(at).ok_or(DualError::MissingSplitNode(at))?;

        let reachable = overlay
            .in_arcs(node)
            .iter()
            .map(|&a| overlay.source(a))
            .find(|&n| overlay.node(n).color == Reachability::Reachable)
            .ok_or_else(|| malformed(node, at, "reachable incoming"))?;
        let unreachable = overlay
            .out_arcs(node)
            .iter()
            .map(|&a| overlay.target(a))
            .find(|&n| overlay.node(n).color == Reachability::Unreachable)
            .ok_or_else(|| malformed(node, at, "unreachable outgoing"))?;

        Ok(Self {
            at,
            reachable: at.bearing_deg(overlay.node(reachable).position),
            unreachable: at.bearing_deg(overlay.node(unreachable).position),
            epsilon: config.direction_epsilon,
        })
    }

    #[inline]
    pub fn at(&self) -> Point {
        self.at
    }

    /// Classify the direction from the split point towards `toward`.
    pub fn classify(&self, toward: Point) -> Side {
        let (dx, dy) = self.at.to(toward);
        if dx == 0.0 && dy == 0.0 {
            return Side::Invalid;
        }
        let wedge = ccw_sweep(self.reachable, self.unreachable);
        if self.near(wedge) {
            return Side::Invalid;
        }
        let bearing = self.at.bearing_deg(toward);
        let sweep = ccw_sweep(self.reachable, bearing);
        if self.near(sweep) || self.near(ccw_sweep(self.unreachable, bearing)) {
            return Side::Invalid;
        }
        if sweep < wedge { Side::Left } else { Side::Right }
    }

    /// `true` if a sweep in `[0, 360)` is within epsilon of a full turn.
    #[inline]
    fn near(&self, sweep: f64) -> bool {
        sweep.min(360.0 - sweep) <= self.epsilon
    }
}

fn malformed(node: NodeId, at: Point, missing: &'static str) -> DualError {
    DualError::MalformedOverlay { node, at, missing }
}
