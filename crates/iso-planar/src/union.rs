//! Geometric union of line segments.
//!
//! # Contract
//!
//! A [`SegmentUnion`] receives a slice of segments and returns geometry whose
//! point set equals the union of the inputs, made of pieces that only meet at
//! their endpoints.  Every crossing, touch and overlap boundary becomes a
//! piece endpoint.  The call is all-or-nothing.
//!
//! # Default primitive
//!
//! [`NodedUnion`] nodes the segments in floating point:
//!
//! 1. Endpoints are registered in a vertex R-tree.  Any later point within
//!    `snap_tolerance` of a registered vertex is replaced by it, so a crossing
//!    shared by several segments yields one vertex and a T-junction reuses the
//!    existing endpoint.
//! 2. A segment R-tree yields candidate pairs; `geo::line_intersection`
//!    classifies each pair as crossing, touching or collinear overlap.
//! 3. Each segment is cut at its sorted split points.  Pieces are stored
//!    with the smaller endpoint first and de-duplicated, which also collapses
//!    repeated and overlapping input.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, Geometry, Line, LineString, MultiLineString};
use log::trace;
use rstar::primitives::{GeomWithData, Line as IndexedLine};
use rstar::{PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashSet;

use iso_core::{IsoConfig, Point, PointKey};

use crate::{PlanarError, PlanarResult};

/// Pluggable geometric union/arrangement primitive.
pub trait SegmentUnion {
    fn union(&self, segments: &[Line<f64>]) -> PlanarResult<Geometry<f64>>;
}

// ── Coordinate conversions ────────────────────────────────────────────────────

#[inline]
pub(crate) fn to_coord(p: Point) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

#[inline]
pub(crate) fn to_point(c: Coord<f64>) -> Point {
    Point::new(c.x, c.y)
}

// ── NodedUnion ────────────────────────────────────────────────────────────────

/// Floating-point segment noder.  See the module docs for the algorithm.
#[derive(Clone, Debug)]
pub struct NodedUnion {
    snap_tolerance: f64,
}

impl NodedUnion {
    pub fn new(config: &IsoConfig) -> Self {
        Self { snap_tolerance: config.snap_tolerance }
    }
}

impl Default for NodedUnion {
    fn default() -> Self {
        Self::new(&IsoConfig::default())
    }
}

impl SegmentUnion for NodedUnion {
    fn union(&self, segments: &[Line<f64>]) -> PlanarResult<Geometry<f64>> {
        for line in segments {
            for c in [line.start, line.end] {
                if !(c.x.is_finite() && c.y.is_finite()) {
                    return Err(PlanarError::NonFiniteCoordinate { x: c.x, y: c.y });
                }
            }
        }

        // Snap endpoints first so crossings prefer existing vertices.
        let mut vertices = VertexSnap::new(self.snap_tolerance);
        let segs: Vec<Line<f64>> = segments
            .iter()
            .map(|l| Line::new(vertices.snap(l.start), vertices.snap(l.end)))
            .filter(|l| l.start != l.end)
            .collect();

        let index: RTree<GeomWithData<IndexedLine<[f64; 2]>, usize>> = RTree::bulk_load(
            segs.iter()
                .enumerate()
                .map(|(i, l)| {
                    GeomWithData::new(IndexedLine::new([l.start.x, l.start.y], [l.end.x, l.end.y]), i)
                })
                .collect(),
        );

        let mut splits: Vec<Vec<Coord<f64>>> = vec![Vec::new(); segs.len()];
        for (i, seg) in segs.iter().enumerate() {
            let envelope = IndexedLine::new([seg.start.x, seg.start.y], [seg.end.x, seg.end.y]).envelope();
            for candidate in index.locate_in_envelope_intersecting(&envelope) {
                let j = candidate.data;
                if j <= i {
                    continue;
                }
                match line_intersection(*seg, segs[j]) {
                    Some(LineIntersection::SinglePoint { intersection, .. }) => {
                        let p = vertices.snap(intersection);
                        splits[i].push(p);
                        splits[j].push(p);
                    }
                    Some(LineIntersection::Collinear { intersection }) => {
                        let a = vertices.snap(intersection.start);
                        let b = vertices.snap(intersection.end);
                        splits[i].extend([a, b]);
                        splits[j].extend([a, b]);
                    }
                    None => {}
                }
            }
        }

        let mut seen: FxHashSet<(PointKey, PointKey)> = FxHashSet::default();
        let mut pieces: Vec<Line<f64>> = Vec::new();
        for (seg, cuts) in segs.iter().zip(splits) {
            for piece in cut(seg, cuts) {
                let (a, b) = canonical(piece);
                if seen.insert((to_point(a).key(), to_point(b).key())) {
                    pieces.push(Line::new(a, b));
                }
            }
        }
        trace!("noded {} input segments into {} pieces", segments.len(), pieces.len());

        Ok(match pieces.len() {
            1 => Geometry::Line(pieces[0]),
            _ => Geometry::MultiLineString(MultiLineString::new(
                pieces.into_iter().map(|l| LineString::new(vec![l.start, l.end])).collect(),
            )),
        })
    }
}

/// Cut `seg` at `cuts`, returning pieces in travel order.  Zero-length
/// pieces are dropped.
fn cut(seg: &Line<f64>, mut cuts: Vec<Coord<f64>>) -> Vec<Line<f64>> {
    let (dx, dy) = (seg.end.x - seg.start.x, seg.end.y - seg.start.y);
    let len2 = dx * dx + dy * dy;
    let param = |c: &Coord<f64>| ((c.x - seg.start.x) * dx + (c.y - seg.start.y) * dy) / len2;

    cuts.retain(|c| *c != seg.start && *c != seg.end);
    cuts.sort_by(|a, b| param(a).total_cmp(&param(b)));
    cuts.dedup();

    let mut stops = Vec::with_capacity(cuts.len() + 2);
    stops.push(seg.start);
    stops.extend(cuts.into_iter().filter(|c| {
        let t = param(c);
        t > 0.0 && t < 1.0
    }));
    stops.push(seg.end);

    stops
        .windows(2)
        .filter(|w| w[0] != w[1])
        .map(|w| Line::new(w[0], w[1]))
        .collect()
}

/// Endpoints ordered by the total order on points.
fn canonical(line: Line<f64>) -> (Coord<f64>, Coord<f64>) {
    let (a, b) = (to_point(line.start), to_point(line.end));
    if a.total_cmp(&b).is_gt() { (line.end, line.start) } else { (line.start, line.end) }
}

// ── Vertex snapping ───────────────────────────────────────────────────────────

/// Registry of vertices created so far.
struct VertexSnap {
    tolerance2: f64,
    tree:       RTree<GeomWithData<[f64; 2], ()>>,
}

impl VertexSnap {
    fn new(tolerance: f64) -> Self {
        Self { tolerance2: tolerance * tolerance, tree: RTree::new() }
    }

    /// Return the registered vertex within tolerance of `c`, or register `c`.
    fn snap(&mut self, c: Coord<f64>) -> Coord<f64> {
        let q = [c.x, c.y];
        if let Some(hit) = self.tree.nearest_neighbor(&q) {
            if hit.distance_2(&q) <= self.tolerance2 {
                let [x, y] = *hit.geom();
                return Coord { x, y };
            }
        }
        self.tree.insert(GeomWithData::new(q, ()));
        c
    }
}
