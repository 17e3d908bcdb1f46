//! Redraw cycles through the facade, the way a map layer drives it.

use glyphgrid::aggregate::heatmap::COLOUR_MAX;
use glyphgrid::aggregate::FnProjection;
use glyphgrid::prelude::*;
use glyphgrid::smooth::SmoothReport;
use glyphgrid_test_utils::{point_cloud, scenario_records, Record, SCENARIO_CELL_SIZE};

fn locate(r: &Record) -> Location {
    Location::Point(r.position())
}

fn config(cell_size: f64) -> AggregationConfig {
    AggregationConfig::builder()
        .cell_size(cell_size)
        .build()
        .unwrap()
}

// ── Aggregation only ─────────────────────────────────────────

#[test]
fn scenario_mean_through_the_facade() {
    let mean = HeatmapAggregator::new(HeatmapKind::Mean, |r: &Record| r.value);
    let mut pass = GlyphPass::new(Tessellation::Grid, config(SCENARIO_CELL_SIZE));
    let out = pass
        .run(&scenario_records(), locate, &IdentityProjection, &[&mean], &mut Context::new())
        .unwrap();
    assert_eq!(out.grid.cell(0, 0).unwrap().scalar("value"), Some(100.0));
    assert_eq!(out.grid.cell(3, 3).unwrap().scalar("value"), Some(20.0));
    assert!(out.grid.iter().all(|c| !c.is_synthetic()));
}

#[test]
fn autoscale_publishes_colour_max() {
    let sum = HeatmapAggregator::new(HeatmapKind::Sum, |r: &Record| r.value);
    let mut pass = GlyphPass::new(Tessellation::Hex, config(24.0));
    let mut ctx = Context::new();
    let out = pass
        .run(&point_cloud(500, 640.0, 480.0, 3), locate, &IdentityProjection, &[&sum], &mut ctx)
        .unwrap();
    let max = out
        .grid
        .iter()
        .filter_map(|c| c.scalar("value"))
        .fold(0.0, f64::max);
    let colour_max = ctx.global.scalar(COLOUR_MAX).unwrap();
    assert!(colour_max > 0.0 && colour_max <= max);
}

#[test]
fn relative_origin_shifts_the_whole_grid() {
    let config = AggregationConfig::builder()
        .cell_size(20.0)
        .origin(Origin::RelativeTo(Point::new(35.0, 47.0)))
        .build()
        .unwrap();
    let count = from_fn(|cell: &mut Cell, _: &Record, w: f64, _: &mut Context| {
        cell.accumulate("count", w);
    });
    let mut pass = GlyphPass::new(Tessellation::Grid, config);
    let out = pass
        .run(&[Record::new(16.0, 8.0, 1.0)], locate, &IdentityProjection, &[&count], &mut Context::new())
        .unwrap();
    assert_eq!((out.grid.x_offset(), out.grid.y_offset()), (15.0, 7.0));
    // (16, 8) shifted by the offsets is (1, 1), inside cell (0, 0).
    let (cell, geometry) = out.grid.cells_with_geometry().next().unwrap();
    assert_eq!(cell.index(), CellIndex::new(0, 0));
    let centre = geometry.center();
    assert_eq!((centre.x, centre.y), (25.0, 17.0));
}

#[test]
fn projection_is_applied_before_discretizing() {
    let scale = FnProjection::new(
        |w: Point| Point::new(w.x * 2.0, w.y * 2.0),
        |s: Point| Point::new(s.x / 2.0, s.y / 2.0),
    );
    let count = from_fn(|cell: &mut Cell, _: &Record, w: f64, _: &mut Context| {
        cell.accumulate("count", w);
    });
    let mut pass = GlyphPass::new(Tessellation::Grid, config(20.0));
    let out = pass
        .run(&[Record::new(15.0, 5.0, 1.0)], locate, &scale, &[&count], &mut Context::new())
        .unwrap();
    assert!(out.grid.cell(1, 0).is_some());
}

// ── Aggregation then smoothing ───────────────────────────────

#[test]
fn kernel_smoothing_on_both_tessellations() {
    let data = point_cloud(400, 400.0, 400.0, 21);
    let mean = HeatmapAggregator::new(HeatmapKind::Mean, |r: &Record| r.value);
    let smoothing = SmoothingConfig::builder()
        .bandwidth(2)
        .properties(SmoothProperty::from_advertised(
            Aggregator::<Record>::smoothable_properties(&mean),
        ))
        .build()
        .unwrap();
    for t in [Tessellation::Grid, Tessellation::Hex] {
        let mut pass = GlyphPass::new(t, config(20.0)).with_smoothing(smoothing.clone());
        let out = pass
            .run(&data, locate, &IdentityProjection, &[&mean], &mut Context::new())
            .unwrap();
        let report: SmoothReport = out.smoothing.unwrap();
        assert_eq!(out.grid.tessellation(), t);
        assert_eq!(out.grid.iter().filter(|c| c.is_synthetic()).count(), report.created);
        assert!(out
            .grid
            .iter()
            .filter_map(|c| c.scalar("value"))
            .all(f64::is_finite));
    }
}

#[test]
fn consecutive_passes_do_not_share_cells() {
    let mut pass = GlyphPass::new(Tessellation::Grid, config(20.0));
    let count = from_fn(|cell: &mut Cell, _: &Record, w: f64, _: &mut Context| {
        cell.accumulate("count", w);
    });
    let first = pass
        .run(&scenario_records(), locate, &IdentityProjection, &[&count], &mut Context::new())
        .unwrap();
    let second = pass
        .run(&scenario_records(), locate, &IdentityProjection, &[&count], &mut Context::new())
        .unwrap();
    assert_eq!(
        first.grid.cell(0, 0).unwrap().scalar("count"),
        second.grid.cell(0, 0).unwrap().scalar("count")
    );
}

#[test]
fn box_blur_through_the_pass() {
    let sum = HeatmapAggregator::new(HeatmapKind::Sum, |r: &Record| r.value);
    let mut pass = GlyphPass::new(Tessellation::Grid, config(SCENARIO_CELL_SIZE)).with_smoothing(
        SmoothingConfig::builder()
            .method(SmoothingMethod::BoxBlur { iterations: 1 })
            .bandwidth(2)
            .property(SmoothProperty::value("value"))
            .build()
            .unwrap(),
    );
    let out = pass
        .run(&scenario_records(), locate, &IdentityProjection, &[&sum], &mut Context::new())
        .unwrap();
    // Radius 1 around (0, 0) and (3, 3): two disjoint 3 x 3 blocks.
    assert_eq!(out.grid.len(), 18);
    assert_eq!(out.smoothing.unwrap().created, 16);
}
