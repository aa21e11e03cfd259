//! `iso-dual`: turn-aware routing on the linear dual of a planar graph.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`transform`] | `LinearDualTransform`, `DualGraph`, `DualIdentifier`, turn costs |
//! | [`overlay`]   | `OverlayNode`, `Reachability`, `Side`, `SplitReference`       |
//! | [`provider`]  | `NeighborProvider` trait, implemented for plain graphs        |
//! | [`lazy`]      | `LazyDualNeighbors`, `Anchors`                                |
//! | [`router`]    | `DijkstraRouter`, `DualRoute`                                 |
//! | [`error`]     | `DualError`, `DualResult<T>`                                  |
//!
//! # Query shape
//!
//! ```text
//! planar graph ──LinearDualTransform──▶ DualGraph
//!                                          │
//!   overlay + source/target + Anchors ─────┤
//!                                          ▼
//!                                  LazyDualNeighbors ──DijkstraRouter──▶ DualRoute
//! ```
//!
//! The dual graph is built once per planar graph.  Anchors for one query are
//! never inserted into it; the lazy provider answers for them on demand.

pub mod error;
pub mod lazy;
pub mod overlay;
pub mod provider;
pub mod router;
pub mod transform;


pub use error::{DualError, DualResult};
pub use lazy::{Anchors, LazyDualNeighbors};
pub use overlay::{OverlayGraph, OverlayNode, Reachability, Side, SplitReference};
pub use provider::NeighborProvider;
pub use router::{DijkstraRouter, DualRoute, Router};
pub use transform::{
    DualGraph, DualIdentifier, DualPlacement, ForbidUTurns, LinearDualTransform, Midpoint, TurnCost,
};
