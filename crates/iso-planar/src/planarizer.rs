//! Planar subdivision builder.
//!
//! # Pipeline
//!
//! ```text
//! raw GeoGraph ──twin dedup──▶ segments ──SegmentUnion──▶ geometry
//!      ──normalize──▶ pieces ──sorted node insert──▶ planar GeoGraph<f64>
//!      ──sort fans──▶ (optional) crossing → source-arc map
//! ```
//!
//! Every piece becomes a twin pair weighted by Euclidean length, so the planar
//! graph is bidirectional regardless of the raw network's one-way arcs.

use std::cmp::Ordering;

use geo::{Geometry, Line};
use log::{debug, log};
use rstar::primitives::{GeomWithData, Line as IndexedLine};
use rstar::{RTree, AABB};
use rustc_hash::{FxHashMap, FxHashSet};

use iso_core::{ArcId, IsoConfig, Point, PointKey};
use iso_graph::GeoGraph;

use crate::union::{to_coord, to_point};
use crate::{NodedUnion, PlanarError, PlanarResult, SegmentUnion};

// ── CrossPointMap ─────────────────────────────────────────────────────────────

/// Links crossing nodes created by planarization to the raw arcs that pass
/// through them, in both directions.
///
/// Only one arc of each raw twin pair is recorded per point.
#[derive(Clone, Debug, Default)]
pub struct CrossPointMap {
    by_point: FxHashMap<PointKey, (Point, Vec<ArcId>)>,
    by_arc:   FxHashMap<ArcId, Vec<Point>>,
}

impl CrossPointMap {
    fn record(&mut self, p: Point, arc: ArcId) {
        self.by_point.entry(p.key()).or_insert_with(|| (p, Vec::new())).1.push(arc);
        self.by_arc.entry(arc).or_default().push(p);
    }

    /// Raw arcs covering the crossing at `p`.  Empty if `p` is not a crossing.
    pub fn arcs_at(&self, p: Point) -> &[ArcId] {
        self.by_point.get(&p.key()).map(|(_, arcs)| arcs.as_slice()).unwrap_or(&[])
    }

    /// Crossing points lying on raw arc `arc`, in discovery order.
    pub fn points_on(&self, arc: ArcId) -> &[Point] {
        self.by_arc.get(&arc).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every crossing point with at least one covering arc.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.by_point.values().map(|(p, _)| *p)
    }

    pub fn len(&self) -> usize {
        self.by_point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_point.is_empty()
    }
}

// ── Planarization ─────────────────────────────────────────────────────────────

/// Output of [`UnionPlanarizer::planarize`].
#[derive(Clone, Debug)]
pub struct Planarization {
    /// Planar graph; arc payload is Euclidean length.
    pub graph: GeoGraph<f64>,
    /// Present when crossing mapping was requested.
    pub cross_points: Option<CrossPointMap>,
    /// Planar nodes that do not exist in the raw graph.
    pub new_nodes: usize,
}

/// Default fan order: arc bearing, counter-clockwise from east.
pub fn by_bearing(graph: &GeoGraph<f64>, a: ArcId, b: ArcId) -> Ordering {
    graph.arc_bearing(a).total_cmp(&graph.arc_bearing(b))
}

// ── UnionPlanarizer ───────────────────────────────────────────────────────────

/// Builds planar graphs from raw geometric graphs.
///
/// # Example
///
/// ```
/// use iso_core::{IsoConfig, Point};
/// use iso_graph::GeoGraph;
/// use iso_planar::UnionPlanarizer;
///
/// let mut raw: GeoGraph<f64> = GeoGraph::new();
/// let a = raw.add_node(Point::new(0.0, 0.0)).id();
/// let b = raw.add_node(Point::new(2.0, 2.0)).id();
/// let c = raw.add_node(Point::new(0.0, 2.0)).id();
/// let d = raw.add_node(Point::new(2.0, 0.0)).id();
/// raw.add_double_arc(a, b, 1.0);
/// raw.add_double_arc(c, d, 1.0);
///
/// let planar = UnionPlanarizer::new(&IsoConfig::default()).planarize(&raw).unwrap();
/// assert_eq!(planar.graph.node_count(), 5); // one crossing added
/// assert_eq!(planar.graph.arc_count(), 8);
/// ```
pub struct UnionPlanarizer<U = NodedUnion> {
    config:        IsoConfig,
    union:         U,
    map_crossings: bool,
}

impl UnionPlanarizer<NodedUnion> {
    /// Planarizer using the default floating-point noder.
    pub fn new(config: &IsoConfig) -> Self {
        Self::with_union(config, NodedUnion::new(config))
    }
}

impl<U: SegmentUnion> UnionPlanarizer<U> {
    pub fn with_union(config: &IsoConfig, union: U) -> Self {
        Self { config: config.clone(), union, map_crossings: false }
    }

    /// Also build the [`CrossPointMap`].
    pub fn map_crossings(mut self, enabled: bool) -> Self {
        self.map_crossings = enabled;
        self
    }

    /// Planarize with the default [`by_bearing`] fan order.
    pub fn planarize<A>(&self, raw: &GeoGraph<A>) -> PlanarResult<Planarization> {
        self.planarize_with(raw, by_bearing)
    }

    /// Planarize, ordering every node's fan with `cmp`.
    pub fn planarize_with<A, F>(&self, raw: &GeoGraph<A>, cmp: F) -> PlanarResult<Planarization>
    where
        F: FnMut(&GeoGraph<f64>, ArcId, ArcId) -> Ordering,
    {
        let segments = canonical_segments(raw);
        let geometry = self.union.union(&segments)?;
        let pieces = normalize(geometry)?;

        let mut endpoints: Vec<Point> = pieces.iter().flat_map(|&(p, q)| [p, q]).collect();
        endpoints.sort_by(Point::total_cmp);
        endpoints.dedup_by(|a, b| a.key() == b.key());

        let mut graph: GeoGraph<f64> = GeoGraph::with_capacity(endpoints.len(), pieces.len() * 2);
        for &p in &endpoints {
            graph.add_node(p);
        }
        for &(p, q) in &pieces {
            let (Some(u), Some(v)) = (graph.node_at(p), graph.node_at(q)) else {
                continue;
            };
            if u == v || graph.first_arc_to(u, v).is_some() {
                continue;
            }
            graph.add_double_arc(u, v, p.distance(q));
        }
        graph.sort_adjacency_by(cmp);

        let new_nodes = graph
            .node_ids()
            .filter(|&n| raw.node_at(*graph.node(n)).is_none())
            .count();

        log!(
            self.config.log_level(),
            "planarized {} raw arcs ({} segments) into {} nodes / {} arcs, {} new nodes",
            raw.arc_count(),
            segments.len(),
            graph.node_count(),
            graph.arc_count(),
            new_nodes,
        );

        let cross_points = self.map_crossings.then(|| self.cross_points(raw, &graph));
        Ok(Planarization { graph, cross_points, new_nodes })
    }

    /// Map every planar node absent from `raw` to the raw arcs covering it.
    fn cross_points<A>(&self, raw: &GeoGraph<A>, planar: &GeoGraph<f64>) -> CrossPointMap {
        let eps = self.config.cover_epsilon;
        let index: RTree<GeomWithData<IndexedLine<[f64; 2]>, ArcId>> = RTree::bulk_load(
            raw.arc_ids()
                .map(|a| {
                    let (p, q) = raw.segment(a);
                    GeomWithData::new(IndexedLine::new([p.x, p.y], [q.x, q.y]), a)
                })
                .collect(),
        );

        let mut map = CrossPointMap::default();
        let mut processed: FxHashSet<ArcId> = FxHashSet::default();
        for n in planar.node_ids() {
            let p = *planar.node(n);
            if raw.node_at(p).is_some() {
                continue;
            }
            let window = AABB::from_corners([p.x - eps, p.y - eps], [p.x + eps, p.y + eps]);
            let mut candidates: Vec<ArcId> = index
                .locate_in_envelope_intersecting(&window)
                .map(|hit| hit.data)
                .collect();
            candidates.sort_unstable();

            processed.clear();
            for arc in candidates {
                if raw.twin(arc).is_some_and(|t| processed.contains(&t)) {
                    continue;
                }
                processed.insert(arc);
                let (a, b) = raw.segment(arc);
                if p.within_bbox(a, b, eps) && p.distance_to_line(a, b) < eps {
                    map.record(p, arc);
                }
            }
        }
        debug!("mapped {} crossing points onto raw arcs", map.len());
        map
    }
}

/// One segment per undirected raw edge: of each twin pair, the arc whose
/// source precedes its target survives.
fn canonical_segments<A>(raw: &GeoGraph<A>) -> Vec<Line<f64>> {
    raw.arc_ids()
        .filter_map(|a| {
            let (p, q) = raw.segment(a);
            let mirrored = raw.twin(a).is_some() && p.total_cmp(&q).is_gt();
            (!mirrored).then(|| Line::new(to_coord(p), to_coord(q)))
        })
        .collect()
}

/// Flatten the union result into endpoint pairs.
fn normalize(geometry: Geometry<f64>) -> PlanarResult<Vec<(Point, Point)>> {
    let mut out = Vec::new();
    flatten_into(geometry, &mut out)?;
    Ok(out)
}

fn flatten_into(geometry: Geometry<f64>, out: &mut Vec<(Point, Point)>) -> PlanarResult<()> {
    match geometry {
        Geometry::Line(l) => out.push((to_point(l.start), to_point(l.end))),
        Geometry::LineString(ls) => {
            out.extend(ls.lines().map(|l| (to_point(l.start), to_point(l.end))));
        }
        Geometry::MultiLineString(mls) => {
            for ls in mls {
                out.extend(ls.lines().map(|l| (to_point(l.start), to_point(l.end))));
            }
        }
        Geometry::GeometryCollection(gc) => {
            for g in gc {
                flatten_into(g, out)?;
            }
        }
        // Degenerate input may collapse to bare points; they carry no edges.
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
        Geometry::Polygon(_) => return Err(PlanarError::UnexpectedGeometry("Polygon")),
        Geometry::MultiPolygon(_) => return Err(PlanarError::UnexpectedGeometry("MultiPolygon")),
        Geometry::Rect(_) => return Err(PlanarError::UnexpectedGeometry("Rect")),
        Geometry::Triangle(_) => return Err(PlanarError::UnexpectedGeometry("Triangle")),
    }
    Ok(())
}
