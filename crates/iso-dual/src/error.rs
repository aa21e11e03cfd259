//! Dual-subsystem error type.

use thiserror::Error;

use iso_core::{ArcId, IsoError, NodeId, Point};

/// Errors produced by `iso-dual`.  Construction errors abort the whole
/// transform or provider; nothing partially built is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DualError {
    #[error("no free position for the dual node of arc {arc} after {attempts} attempts")]
    PositionExhausted { arc: ArcId, attempts: u32 },

    #[error("overlay has no split node at {0}")]
    MissingSplitNode(Point),

    #[error("overlay node {node} at {at} has no {missing} arc")]
    MalformedOverlay { node: NodeId, at: Point, missing: &'static str },

    #[error("anchor {0} collides with a dual node or the other anchor")]
    AnchorCollision(NodeId),

    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error(transparent)]
    Config(#[from] IsoError),
}

pub type DualResult<T> = Result<T, DualError>;
