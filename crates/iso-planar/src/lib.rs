//! `iso-planar`: turn a soup of possibly-crossing road segments into a planar
//! graph.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`union`]       | `SegmentUnion` trait, default `NodedUnion` primitive      |
//! | [`planarizer`]  | `UnionPlanarizer`, `Planarization`, `CrossPointMap`       |
//! | [`error`]       | `PlanarError`, `PlanarResult<T>`                          |
//!
//! The union primitive is a trait so a robust-arithmetic implementation can
//! replace the floating-point default without touching the planarizer.

pub mod error;
pub mod planarizer;
pub mod union;

#[cfg(test)]
mod tests;

pub use error::{PlanarError, PlanarResult};
pub use planarizer::{by_bearing, CrossPointMap, Planarization, UnionPlanarizer};
pub use union::{NodedUnion, SegmentUnion};
