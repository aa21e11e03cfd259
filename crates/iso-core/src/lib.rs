//! `iso-core`: foundational types shared by every `iso-*` crate.
//!
//! This crate has no `iso-*` dependencies and only `thiserror` and `log` (plus
//! optional `serde`) from the outside world.
//!
//! # What lives here
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`ids`]      | `NodeId`, `ArcId`                                       |
//! | [`geo`]      | `Point`, `PointKey`, bearings and segment distances     |
//! | [`config`]   | `IsoConfig`                                             |
//! | [`error`]    | `IsoError`, `IsoResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::IsoConfig;
pub use error::{IsoError, IsoResult};
pub use geo::{Point, PointKey};
pub use ids::{ArcId, NodeId};
