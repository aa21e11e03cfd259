//! Unit tests for iso-planar.
//!
//! Networks are built by hand; the soup test draws random segments from a
//! fixed-seed `SmallRng`.

#[cfg(test)]
mod helpers {
    use iso_core::Point;
    use iso_graph::GeoGraph;

    /// Raw graph with one twin pair per `(from, to)` segment.
    pub fn roads(segments: &[((f64, f64), (f64, f64))]) -> GeoGraph<f64> {
        let mut g = GeoGraph::new();
        for &((x0, y0), (x1, y1)) in segments {
            let a = g.add_node(Point::new(x0, y0)).id();
            let b = g.add_node(Point::new(x1, y1)).id();
            g.add_double_arc(a, b, 0.0);
        }
        g
    }
}

// ── Arrangement ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod arrangement {
    use iso_core::{IsoConfig, Point};
    use iso_graph::GeoGraph;

    use crate::UnionPlanarizer;

    fn planarizer() -> UnionPlanarizer {
        UnionPlanarizer::new(&IsoConfig::default())
    }

    #[test]
    fn three_strokes_through_one_point_add_one_node() {
        let raw = super::helpers::roads(&[
            ((-1.0, 0.0), (1.0, 0.0)),
            ((0.0, -1.0), (0.0, 1.0)),
            ((-1.0, -1.0), (1.0, 1.0)),
        ]);
        let out = planarizer().planarize(&raw).unwrap();
        assert_eq!(out.new_nodes, 1);
        assert_eq!(out.graph.node_count(), 7);
        assert_eq!(out.graph.arc_count(), 12);
        let centre = out.graph.node_at(Point::new(0.0, 0.0)).expect("crossing node");
        assert_eq!(out.graph.out_degree(centre), 6);
    }

    #[test]
    fn t_junction_adds_no_node() {
        let raw = super::helpers::roads(&[((0.0, 0.0), (2.0, 0.0)), ((1.0, 0.0), (1.0, 1.0))]);
        let out = planarizer().planarize(&raw).unwrap();
        assert_eq!(out.new_nodes, 0);
        assert_eq!(out.graph.node_count(), 4);
        // Horizontal split in two, vertical untouched.
        assert_eq!(out.graph.arc_count(), 6);
        let foot = out.graph.node_at(Point::new(1.0, 0.0)).unwrap();
        assert_eq!(out.graph.out_degree(foot), 3);
    }

    #[test]
    fn every_planar_arc_is_twinned_and_weighted_by_length() {
        let raw = super::helpers::roads(&[((0.0, 0.0), (4.0, 4.0)), ((0.0, 4.0), (4.0, 0.0))]);
        let out = planarizer().planarize(&raw).unwrap();
        let g = &out.graph;
        for a in g.arc_ids() {
            let t = g.twin(a).unwrap();
            assert_eq!(g.twin(t), Some(a));
            assert!((*g.arc(a) - g.arc_length(a)).abs() < 1e-12);
        }
        let total: f64 = g.arc_ids().map(|a| *g.arc(a)).sum();
        assert!((total - 4.0 * 32f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn twin_pairs_are_unioned_once() {
        let mut raw: GeoGraph<f64> = GeoGraph::new();
        let a = raw.add_node(Point::new(0.0, 0.0)).id();
        let b = raw.add_node(Point::new(3.0, 0.0)).id();
        raw.add_double_arc(a, b, 0.0);
        // A one-way duplicate on the same geometry collapses too.
        raw.add_arc(b, a, 0.0);
        let out = planarizer().planarize(&raw).unwrap();
        assert_eq!(out.graph.node_count(), 2);
        assert_eq!(out.graph.arc_count(), 2);
    }

    #[test]
    fn collinear_overlap_is_split_at_overlap_ends() {
        let raw = super::helpers::roads(&[((0.0, 0.0), (2.0, 0.0)), ((1.0, 0.0), (3.0, 0.0))]);
        let out = planarizer().planarize(&raw).unwrap();
        assert_eq!(out.graph.node_count(), 4);
        assert_eq!(out.graph.arc_count(), 6);
        assert_eq!(out.new_nodes, 0);
    }

    #[test]
    fn zero_length_arcs_are_tolerated() {
        let mut raw: GeoGraph<f64> = GeoGraph::new();
        let a = raw.add_node(Point::new(1.0, 1.0)).id();
        let b = raw.add_node(Point::new(2.0, 1.0)).id();
        raw.add_arc(a, a, 0.0);
        raw.add_double_arc(a, b, 0.0);
        let out = planarizer().planarize(&raw).unwrap();
        assert_eq!(out.graph.node_count(), 2);
        assert_eq!(out.graph.arc_count(), 2);
    }

    #[test]
    fn empty_network_gives_empty_graph() {
        let raw: GeoGraph<f64> = GeoGraph::new();
        let out = planarizer().planarize(&raw).unwrap();
        assert!(out.graph.is_empty());
        assert!(out.cross_points.is_none());
    }

    #[test]
    fn nodes_are_inserted_in_coordinate_order() {
        let raw = super::helpers::roads(&[((5.0, 0.0), (0.0, 0.0)), ((0.0, 3.0), (0.0, 0.0))]);
        let out = planarizer().planarize(&raw).unwrap();
        let order: Vec<Point> = out.graph.node_ids().map(|n| *out.graph.node(n)).collect();
        assert_eq!(
            order,
            vec![Point::new(0.0, 0.0), Point::new(0.0, 3.0), Point::new(5.0, 0.0)]
        );
    }

    #[test]
    fn fans_are_sorted_by_bearing() {
        let raw = super::helpers::roads(&[((0.0, 0.0), (2.0, 2.0)), ((0.0, 2.0), (2.0, 0.0))]);
        let out = planarizer().planarize(&raw).unwrap();
        let g = &out.graph;
        let centre = g.node_at(Point::new(1.0, 1.0)).unwrap();
        let bearings: Vec<f64> = g.out_arcs(centre).iter().map(|&a| g.arc_bearing(a).round()).collect();
        assert_eq!(bearings, vec![45.0, 135.0, 225.0, 315.0]);
    }

    #[test]
    fn non_finite_input_aborts() {
        let raw = super::helpers::roads(&[((0.0, 0.0), (f64::NAN, 1.0))]);
        assert!(matches!(
            planarizer().planarize(&raw),
            Err(crate::PlanarError::NonFiniteCoordinate { .. })
        ));
    }
}

// ── Crossing map ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod crossings {
    use iso_core::{IsoConfig, Point};

    use crate::UnionPlanarizer;

    #[test]
    fn crossing_maps_to_one_arc_per_twin_pair() {
        let raw = super::helpers::roads(&[((0.0, 0.0), (2.0, 2.0)), ((0.0, 2.0), (2.0, 0.0))]);
        let out = UnionPlanarizer::new(&IsoConfig::default())
            .map_crossings(true)
            .planarize(&raw)
            .unwrap();
        let map = out.cross_points.expect("requested");
        assert_eq!(map.len(), 1);
        let arcs = map.arcs_at(Point::new(1.0, 1.0));
        assert_eq!(arcs.len(), 2);
        for &a in arcs {
            assert_eq!(map.points_on(a), &[Point::new(1.0, 1.0)]);
            // The recorded arc is the first of its twin pair.
            assert!(raw.twin(a).unwrap() > a);
        }
    }

    #[test]
    fn long_arc_collects_every_crossing() {
        let raw = super::helpers::roads(&[
            ((0.0, 0.0), (10.0, 0.0)),
            ((2.0, -1.0), (2.0, 1.0)),
            ((7.0, -1.0), (7.0, 1.0)),
        ]);
        let out = UnionPlanarizer::new(&IsoConfig::default())
            .map_crossings(true)
            .planarize(&raw)
            .unwrap();
        let map = out.cross_points.unwrap();
        assert_eq!(map.len(), 2);
        let horizontal = raw.first_arc_to(raw.node_at(Point::new(0.0, 0.0)).unwrap(), raw.node_at(Point::new(10.0, 0.0)).unwrap()).unwrap();
        assert_eq!(map.points_on(horizontal), &[Point::new(2.0, 0.0), Point::new(7.0, 0.0)]);
        assert!(map.arcs_at(Point::new(5.0, 0.0)).is_empty());
    }

    #[test]
    fn existing_nodes_are_not_crossings() {
        let raw = super::helpers::roads(&[((0.0, 0.0), (2.0, 0.0)), ((1.0, 0.0), (1.0, 1.0))]);
        let out = UnionPlanarizer::new(&IsoConfig::default())
            .map_crossings(true)
            .planarize(&raw)
            .unwrap();
        assert!(out.cross_points.unwrap().is_empty());
    }
}

// ── Pluggable primitive ───────────────────────────────────────────────────────

#[cfg(test)]
mod primitive {
    use geo::{coord, Geometry, Line, Polygon, LineString};
    use iso_core::IsoConfig;

    use crate::{PlanarError, PlanarResult, SegmentUnion, UnionPlanarizer};

    struct Fixed(Geometry<f64>);

    impl SegmentUnion for Fixed {
        fn union(&self, _segments: &[Line<f64>]) -> PlanarResult<Geometry<f64>> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl SegmentUnion for Failing {
        fn union(&self, _segments: &[Line<f64>]) -> PlanarResult<Geometry<f64>> {
            Err(PlanarError::Union("arrangement overflow".into()))
        }
    }

    #[test]
    fn single_line_result_is_normalized() {
        let line = Line::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 0.0 });
        let raw = super::helpers::roads(&[((0.0, 0.0), (1.0, 0.0))]);
        let out = UnionPlanarizer::with_union(&IsoConfig::default(), Fixed(Geometry::Line(line)))
            .planarize(&raw)
            .unwrap();
        assert_eq!(out.graph.arc_count(), 2);
    }

    #[test]
    fn polygon_result_is_rejected() {
        let ring = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        let raw = super::helpers::roads(&[((0.0, 0.0), (1.0, 0.0))]);
        let result = UnionPlanarizer::with_union(
            &IsoConfig::default(),
            Fixed(Geometry::Polygon(Polygon::new(ring, vec![]))),
        )
        .planarize(&raw);
        assert_eq!(result.unwrap_err(), PlanarError::UnexpectedGeometry("Polygon"));
    }

    #[test]
    fn union_failure_aborts() {
        let raw = super::helpers::roads(&[((0.0, 0.0), (1.0, 0.0))]);
        let result = UnionPlanarizer::with_union(&IsoConfig::default(), Failing).planarize(&raw);
        assert!(matches!(result, Err(PlanarError::Union(_))));
    }
}

// ── Random soups ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod soup {
    use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
    use geo::{Coord, Line};
    use iso_core::{IsoConfig, Point};
    use iso_graph::GeoGraph;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use crate::UnionPlanarizer;

    fn random_roads(seed: u64, count: usize) -> GeoGraph<f64> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut g = GeoGraph::new();
        for _ in 0..count {
            let a = g.add_node(Point::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0))).id();
            let b = g.add_node(Point::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0))).id();
            g.add_double_arc(a, b, 0.0);
        }
        g
    }

    #[test]
    fn output_has_no_proper_crossings() {
        for seed in [1u64, 7, 42] {
            let raw = random_roads(seed, 12);
            let out = UnionPlanarizer::new(&IsoConfig::default()).planarize(&raw).unwrap();
            let g = &out.graph;
            let lines: Vec<Line<f64>> = g
                .arc_ids()
                .filter(|&a| g.twin(a).is_some_and(|t| t > a))
                .map(|a| {
                    let (p, q) = g.segment(a);
                    Line::new(Coord { x: p.x, y: p.y }, Coord { x: q.x, y: q.y })
                })
                .collect();
            for i in 0..lines.len() {
                for j in i + 1..lines.len() {
                    match line_intersection(lines[i], lines[j]) {
                        Some(LineIntersection::SinglePoint { is_proper, .. }) => {
                            assert!(!is_proper, "seed {seed}: pieces {i} and {j} cross");
                        }
                        Some(LineIntersection::Collinear { .. }) => {
                            panic!("seed {seed}: pieces {i} and {j} overlap");
                        }
                        None => {}
                    }
                }
            }
            // Every raw endpoint survives as a planar node.
            for n in raw.node_ids() {
                assert!(g.node_at(*raw.node(n)).is_some());
            }
        }
    }
}
