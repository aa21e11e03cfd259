//! Planar coordinates and the handful of geometric helpers the graph layers
//! need.
//!
//! Coordinates are `f64` in a projected (metric) plane, so Euclidean length is
//! the arc weight.  Two points are the same node only when their coordinates
//! are exactly equal; [`PointKey`] turns that rule into a hashable key.

use std::cmp::Ordering;
use std::fmt;

/// A position in the projected plane.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Exact-equality hash key for a [`Point`].  `-0.0` and `0.0` map to the same
/// key, matching `f64` equality.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey(u64, u64);

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn key(self) -> PointKey {
        // Adding 0.0 folds -0.0 into +0.0.
        PointKey((self.x + 0.0).to_bits(), (self.y + 0.0).to_bits())
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Total order on coordinates: lower x first, ties broken by lower y.
    #[inline]
    pub fn total_cmp(&self, other: &Point) -> Ordering {
        (self.x + 0.0)
            .total_cmp(&(other.x + 0.0))
            .then_with(|| (self.y + 0.0).total_cmp(&(other.y + 0.0)))
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Vector from `self` to `other`.
    #[inline]
    pub fn to(self, other: Point) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }

    /// Direction of `self → other` in degrees, counter-clockwise from the
    /// positive x axis, in `[0, 360)`.  Zero-length vectors return `0.0`.
    pub fn bearing_deg(self, other: Point) -> f64 {
        let (dx, dy) = self.to(other);
        if dx == 0.0 && dy == 0.0 {
            return 0.0;
        }
        let deg = dy.atan2(dx).to_degrees();
        if deg < 0.0 { deg + 360.0 } else { deg }
    }

    /// Shift `self` by `step` units along the direction `from → to`.
    /// Degenerate directions fall back to the positive x axis.
    pub fn nudged_along(self, from: Point, to: Point, step: f64) -> Point {
        let (dx, dy) = from.to(to);
        let len = dx.hypot(dy);
        if len > 0.0 {
            Point::new(self.x + dx / len * step, self.y + dy / len * step)
        } else {
            Point::new(self.x + step, self.y)
        }
    }

    /// Distance from `self` to the infinite line through `a` and `b`.
    /// Collapses to point distance when `a == b`.
    pub fn distance_to_line(self, a: Point, b: Point) -> f64 {
        let (dx, dy) = a.to(b);
        let len = dx.hypot(dy);
        if len == 0.0 {
            return self.distance(a);
        }
        ((self.x - a.x) * dy - (self.y - a.y) * dx).abs() / len
    }

    /// `true` if `self` lies inside the axis-aligned box spanned by `a` and
    /// `b`, grown by `eps` on every side.
    #[inline]
    pub fn within_bbox(self, a: Point, b: Point, eps: f64) -> bool {
        self.x >= a.x.min(b.x) - eps
            && self.x <= a.x.max(b.x) + eps
            && self.y >= a.y.min(b.y) - eps
            && self.y <= a.y.max(b.y) + eps
    }
}

/// `true` if `bearing` (degrees) is within `tolerance` of a multiple of 45°.
pub fn is_octilinear(bearing: f64, tolerance: f64) -> bool {
    let r = bearing.rem_euclid(45.0);
    r.min(45.0 - r) <= tolerance
}

/// Counter-clockwise sweep in degrees from direction `from` to direction
/// `to`, in `[0, 360)`.
#[inline]
pub fn ccw_sweep(from: f64, to: f64) -> f64 {
    (to - from).rem_euclid(360.0)
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.x, self.y)
    }
}
