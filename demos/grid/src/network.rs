//! Synthetic street network and query overlay.
//!
//! Streets are drawn as long strokes that cross each other without shared
//! nodes, the way a digitised map arrives before planarization:
//!
//! ```text
//!  (0,200) ─────────────────────────── (300,200)
//!     │  ╲        │          │            │
//!  (0,100) ───────╲───────────────────── (300,100)
//!     │        │     ╲       │            │
//!   (0,0) ─────────────────────╲──────── (300,0)
//! ```
//!
//! Units are metres.  The diagonal avenue is the only non-octilinear street.

use iso_core::Point;
use iso_dual::{OverlayGraph, OverlayNode};
use iso_graph::GeoGraph;

/// Street spacing in metres.
pub const BLOCK: f64 = 100.0;

const COLUMNS: usize = 3;
const ROWS:    usize = 2;

/// Distance of overlay reference nodes from their split node.
const REFERENCE_OFFSET: f64 = 10.0;

/// Build the raw stroke network.
///
/// Returns `(network, [south_west, north_east])`: the two corners used as
/// query endpoints.
pub fn build_network() -> (GeoGraph<f64>, [Point; 2]) {
    let mut g: GeoGraph<f64> = GeoGraph::new();
    let width = COLUMNS as f64 * BLOCK;
    let height = ROWS as f64 * BLOCK;

    let mut street = |from: Point, to: Point| {
        let a = g.add_node(from).id();
        let b = g.add_node(to).id();
        g.add_double_arc(a, b, from.distance(to));
    };

    // East-west streets.
    for j in 0..=ROWS {
        let y = j as f64 * BLOCK;
        street(Point::new(0.0, y), Point::new(width, y));
    }
    // North-south streets.
    for i in 0..=COLUMNS {
        let x = i as f64 * BLOCK;
        street(Point::new(x, 0.0), Point::new(x, height));
    }
    // Diagonal avenue, crossing streets between their intersections.
    street(Point::new(0.0, height), Point::new(width, 0.0));

    (g, [Point::new(0.0, 0.0), Point::new(width, height)])
}

/// Overlay around the two query endpoints.
///
/// At `source` the reachable side lies to the south-west, so departures east
/// and north classify as `Right`.  At `target` the reachable side faces
/// north-west and the unreachable side south-east, so arrivals from the west
/// and south classify as `Left`.
pub fn build_overlay(source: Point, target: Point) -> OverlayGraph {
    let mut overlay = OverlayGraph::new();
    let d = REFERENCE_OFFSET;
    add_split(
        &mut overlay,
        source,
        Point::new(source.x - d, source.y),
        Point::new(source.x, source.y - d),
    );
    add_split(
        &mut overlay,
        target,
        Point::new(target.x - d, target.y + d),
        Point::new(target.x + d, target.y - d),
    );
    overlay
}

fn add_split(overlay: &mut OverlayGraph, at: Point, reachable: Point, unreachable: Point) {
    let split = overlay.add_node(OverlayNode::reachable(at)).id();
    let r = overlay.add_node(OverlayNode::reachable(reachable)).id();
    let u = overlay.add_node(OverlayNode::unreachable(unreachable)).id();
    overlay.add_arc(r, split, ());
    overlay.add_arc(split, u, ());
}
