use glyphgrid_aggregate::{
    Aggregation, AggregationConfig, Aggregator, Context, Grid, HeatmapAggregator, HeatmapKind,
    IdentityProjection, Location,
};
use glyphgrid_core::CellIndex;
use glyphgrid_smooth::{
    kernel_weight, BoxBlur, KernelSmoother, SmoothProperty, SmoothingConfig, SmoothingMethod,
};
use glyphgrid_space::Discretizer;
use glyphgrid_test_utils::{hex, point_cloud, sparse_grid, square, Record};
use proptest::prelude::*;
use std::sync::Arc;

fn aggregate(discretizer: Arc<dyn Discretizer>, data: &[Record]) -> (Grid, Vec<SmoothProperty>) {
    let config = AggregationConfig::builder()
        .cell_size(discretizer.cell_size())
        .build()
        .unwrap();
    let agg = Aggregation::new(discretizer, &config, &IdentityProjection).unwrap();
    let h = HeatmapAggregator::new(HeatmapKind::Sum, |r: &Record| r.value);
    let props = SmoothProperty::from_advertised(Aggregator::<Record>::smoothable_properties(&h));
    let out = agg.run(data, |r| Location::Point(r.position()), &[&h], &mut Context::new());
    (out.grid, props)
}

fn total(grid: &Grid) -> f64 {
    grid.iter().filter_map(|c| c.scalar("value")).sum()
}

// ── Aggregate then smooth ───────────────────────────────────

#[test]
fn heatmap_output_smooths_with_advertised_properties() {
    let data = point_cloud(300, 400.0, 300.0, 11);
    for d in [square(20.0), hex(20.0)] {
        let (mut grid, props) = aggregate(d, &data);
        let direct = grid.len();
        let report = KernelSmoother::new(3).unwrap().smooth(&mut grid, &props).unwrap();
        assert_eq!(grid.len(), direct + report.created);
        assert_eq!(grid.iter().filter(|c| c.is_synthetic()).count(), report.created);
        assert!(grid
            .iter()
            .filter_map(|c| c.scalar("value"))
            .all(|v| v.is_finite() && v >= 0.0));
    }
}

#[test]
fn smoothing_never_invents_nan_in_sparse_data() {
    let mut grid = sparse_grid(hex(24.0), "value", &[((-3, -1), 5.0), ((4, 2), f64::NAN)]);
    KernelSmoother::new(4)
        .unwrap()
        .smooth(&mut grid, &[SmoothProperty::value("value")])
        .unwrap();
    assert!(grid.iter().all(|c| c.scalar("value").is_some_and(f64::is_finite)));
}

#[test]
fn hex_kernel_is_mirror_symmetric_across_columns() {
    // A single source on an odd column spreads identically to the left
    // and right neighbouring (even) columns.
    let mut grid = sparse_grid(hex(20.0), "value", &[((1, 0), 10.0)]);
    KernelSmoother::new(2)
        .unwrap()
        .smooth(&mut grid, &[SmoothProperty::value("value")])
        .unwrap();
    for row in -2..=2 {
        let left = grid.cell(0, row).and_then(|c| c.scalar("value"));
        let right = grid.cell(2, row).and_then(|c| c.scalar("value"));
        match (left, right) {
            (Some(l), Some(r)) => assert!((l - r).abs() < 1e-12, "row {row}: {l} vs {r}"),
            (None, None) => {}
            other => panic!("row {row}: asymmetric {other:?}"),
        }
    }
}

#[test]
fn blur_keeps_empty_regions_sparse() {
    let mut grid = sparse_grid(square(10.0), "value", &[((0, 0), 4.0), ((40, 40), 4.0)]);
    BoxBlur::new(1, 3)
        .smooth(&mut grid, &[SmoothProperty::value("value")])
        .unwrap();
    // Three radius-1 passes reach at most 3 cells from each source.
    assert!(!grid.contains(CellIndex::new(20, 20)));
    assert!(grid.iter().all(|c| {
        let i = c.index();
        (i.col.abs() <= 3 && i.row.abs() <= 3) || ((i.col - 40).abs() <= 3 && (i.row - 40).abs() <= 3)
    }));
}

#[test]
fn blur_preserves_mass_away_from_edges() {
    let mut grid = sparse_grid(square(10.0), "value", &[((0, 0), 9.0)]);
    BoxBlur::new(1, 1)
        .smooth(&mut grid, &[SmoothProperty::value("value")])
        .unwrap();
    assert!((total(&grid) - 9.0).abs() < 1e-9);
}

#[test]
fn config_dispatch_matches_direct_calls() {
    let data = point_cloud(200, 300.0, 300.0, 5);
    let (base, props) = aggregate(square(15.0), &data);

    let mut via_config = base.clone();
    SmoothingConfig::builder()
        .method(SmoothingMethod::BoxBlur { iterations: 2 })
        .bandwidth(4)
        .properties(props.clone())
        .build()
        .unwrap()
        .apply(&mut via_config)
        .unwrap();

    let mut direct = base;
    BoxBlur::new(2, 2).smooth(&mut direct, &props).unwrap();

    assert_eq!(via_config.len(), direct.len());
    for (a, b) in via_config.iter().zip(direct.iter()) {
        assert_eq!(a, b);
    }
}

proptest! {
    #[test]
    fn kernel_weight_is_zero_at_and_beyond_radius(r in 1u32..20, extra in 0.0f64..10.0) {
        prop_assert_eq!(kernel_weight(r as f64 + extra, r as f64), 0.0);
    }

    #[test]
    fn uniform_interior_survives_any_radius(r in 1u32..4, v in 0.5f64..50.0) {
        let cells: Vec<((i32, i32), f64)> = (-8..=8)
            .flat_map(|c| (-8..=8).map(move |row| ((c, row), v)))
            .collect();
        for d in [square(10.0), hex(20.0)] {
            let mut grid = sparse_grid(d, "value", &cells);
            KernelSmoother::new(r).unwrap().smooth(&mut grid, &[SmoothProperty::value("value")]).unwrap();
            let got = grid.cell(0, 0).unwrap().scalar("value").unwrap();
            prop_assert!((got - v).abs() < 1e-9 * v.max(1.0));
        }
    }
}
