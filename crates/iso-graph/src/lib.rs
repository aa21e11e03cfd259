//! `iso-graph`: directed graph store and generic traversal.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                        |
//! |------------|-----------------------------------------------------------------|
//! | [`graph`]  | `DirectedGraph`, `NodeSlot`, `Compaction`, payload traits       |
//! | [`search`] | `GraphSearch`, `Frontier` (`Fifo`/`Lifo`), `SearchVisitor`      |
//!
//! Graphs are populated first and traversed afterwards.  Every consumer takes
//! `&DirectedGraph`, so the borrow checker keeps mutation and traversal apart.

pub mod graph;
pub mod search;


pub use graph::{ArcWeight, Compaction, DirectedGraph, NodePayload, NodeSlot, Rotation};
pub use search::{Fifo, Frontier, GraphSearch, Lifo, NoopVisitor, SearchVisitor};

/// A graph whose nodes are plain positions.  Planar and dual graphs use this.
pub type GeoGraph<A> = DirectedGraph<iso_core::Point, A>;
