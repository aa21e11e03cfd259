//! grid: end-to-end demo of the isochrone routing core.
//!
//! Planarizes a small synthetic street network, builds its turn-aware linear
//! dual, then answers one corner-to-corner route query and one budgeted
//! reachability query through the lazy dual provider.
//!
//! Set `RUST_LOG=debug` to see the per-stage statistics.

mod network;

use anyhow::{Context, Result};
use rustc_hash::FxHashSet;

use iso_core::{ArcId, IsoConfig};
use iso_dual::{Anchors, DijkstraRouter, LazyDualNeighbors, LinearDualTransform, Router};
use iso_graph::{GraphSearch, NoopVisitor};
use iso_planar::UnionPlanarizer;

use network::{BLOCK, build_network, build_overlay};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Reachability budget in metres of travel.
const BUDGET:   f64 = 3.5 * BLOCK;
/// Detour factor on the final arc of every route.
const DILATION: f64 = 1.2;
/// Extra factor when the final arc is not octilinear.
const MALUS:    f64 = 1.5;

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    println!("=== grid: isochrone routing core ===");

    let config = IsoConfig::default().with_dilation(DILATION).with_malus(MALUS).with_verbose(true);
    config.validate()?;

    // 1. Raw strokes.
    let (raw, [south_west, north_east]) = build_network();
    let components = GraphSearch::new().components(&raw, &mut NoopVisitor);
    println!(
        "Raw network: {} nodes, {} arcs, {} stroke components",
        raw.node_count(),
        raw.arc_count(),
        components.len()
    );

    // 2. Planarize, mapping new crossings back to the strokes.
    let planar = UnionPlanarizer::new(&config).map_crossings(true).planarize(&raw)?;
    let crossings = planar.cross_points.as_ref().map_or(0, |m| m.len());
    println!(
        "Planar graph: {} nodes ({} new), {} arcs, {} mapped crossings",
        planar.graph.node_count(),
        planar.new_nodes,
        planar.graph.arc_count(),
        crossings
    );
    if let Some(map) = &planar.cross_points {
        let mut points: Vec<_> = map.points().collect();
        points.sort_by(|a, b| a.total_cmp(b));
        for p in points {
            println!("  crossing {p} lies on {} stroke(s)", map.arcs_at(p).len());
        }
    }
    let base = &planar.graph;

    // 3. Linear dual.
    let dual = LinearDualTransform::new(&config).transform(base)?;
    println!("Dual graph: {} nodes, {} turns", dual.graph.node_count(), dual.graph.arc_count());

    // 4. Corner-to-corner route.
    let source = base.node_at(south_west).context("source corner missing from planar graph")?;
    let target = base.node_at(north_east).context("target corner missing from planar graph")?;
    let overlay = build_overlay(south_west, north_east);
    let anchors = Anchors::past_end(&dual);
    let provider = LazyDualNeighbors::new(base, &dual, &overlay, source, target, anchors, &config)?;
    if provider.withheld() > 0 {
        log::warn!("{} candidate arcs withheld by the overlay", provider.withheld());
    }

    let router = DijkstraRouter;
    let route = router.route(&provider, anchors.source, anchors.target)?;
    let arcs: Vec<ArcId> = route.base_arcs(&dual.identifier);
    println!();
    println!("Route {south_west} → {north_east}: cost {:.1} over {} arcs", route.total_cost, arcs.len());
    for arc in &arcs {
        let (p, q) = base.segment(*arc);
        println!("  {arc}: {p} → {q}  ({:.1} m)", base.arc(*arc));
    }

    // 5. Isochrone: every street reachable within the budget.
    let reached = router.reachable_within(&provider, anchors.source, BUDGET);
    let streets: FxHashSet<ArcId> = reached
        .iter()
        .filter_map(|&(node, _)| dual.identifier.origin_arc(node))
        .collect();
    let frontier = reached.last().map_or(0.0, |&(_, cost)| cost);
    println!();
    println!(
        "Within {BUDGET:.0} m: {} of {} directed arcs, farthest settled at {frontier:.1}",
        streets.len(),
        base.arc_count()
    );

    Ok(())
}
