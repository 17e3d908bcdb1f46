//! Distance-weighted kernel smoothing over grid or hex neighbourhoods.
//!
//! Each target cell becomes the weighted mean of the cells within the
//! kernel radius, using `w(d) = (r - d) / (r + d)` for `d < r`. Empty
//! neighbours count as zero with their full weight, so values bleed into
//! empty cells and fade at the edge of the data.
//!
//! The sweep visits only cells within the radius of a populated cell, so
//! cost follows the data rather than its bounding box. All results are
//! staged and committed after the sweep, so no cell reads a neighbour's
//! already-smoothed value.

use crate::error::SmoothError;
use crate::property::{check_kinds, SmoothProperty, SmoothReport};
use glyphgrid_aggregate::Grid;
use glyphgrid_core::{CellIndex, ConfigError, PropertyKind, PropertyValue, Tessellation};
use glyphgrid_space::Discretizer;
use std::collections::BTreeSet;

/// Kernel weight for distance `d` at radius `r`: `(r - d) / (r + d)`
/// when `d < r`, otherwise 0.
pub fn kernel_weight(d: f64, r: f64) -> f64 {
    if d < r {
        (r - d) / (r + d)
    } else {
        0.0
    }
}

/// Non-zero `(dc, dr, w)` offsets, one list per column parity.
///
/// On squares both lists are the same. On hexes the table is computed
/// once from an odd origin column using unit-scale centres; for an even
/// target column an odd column offset reads the row below in that table,
/// since the neighbouring column sits half a cell higher instead of lower.
#[derive(Clone, Debug, PartialEq)]
pub struct KernelWeights {
    even: Vec<(i32, i32, f64)>,
    odd: Vec<(i32, i32, f64)>,
}

impl KernelWeights {
    /// Build the weights for `discretizer`'s tessellation at `radius`.
    pub fn new(discretizer: &dyn Discretizer, radius: u32) -> Self {
        let r = radius as i32;
        let rf = radius as f64;
        match discretizer.tessellation() {
            Tessellation::Grid => {
                let mut offsets = Vec::new();
                for dc in -r..=r {
                    for dr in -r..=r {
                        let w = kernel_weight(((dc * dc + dr * dr) as f64).sqrt(), rf);
                        if w > 0.0 {
                            offsets.push((dc, dr, w));
                        }
                    }
                }
                Self {
                    even: offsets.clone(),
                    odd: offsets,
                }
            }
            Tessellation::Hex => {
                let origin = CellIndex::new(1, 0);
                let o = discretizer.index_to_center_unit_scale(origin);
                let base = |dc: i32, dr: i32| {
                    let n = discretizer.index_to_center_unit_scale(origin.offset(dc, dr));
                    kernel_weight(o.distance(&n), rf)
                };
                let mut even = Vec::new();
                let mut odd = Vec::new();
                for dc in -r..=r {
                    for dr in -r..=r {
                        let w_odd = base(dc, dr);
                        if w_odd > 0.0 {
                            odd.push((dc, dr, w_odd));
                        }
                        let w_even = if dc.rem_euclid(2) == 1 {
                            base(dc, dr + 1)
                        } else {
                            w_odd
                        };
                        if w_even > 0.0 {
                            even.push((dc, dr, w_even));
                        }
                    }
                }
                Self { even, odd }
            }
        }
    }

    /// Offsets for a target cell in column `col`.
    pub fn for_column(&self, col: i32) -> &[(i32, i32, f64)] {
        if col.rem_euclid(2) == 0 {
            &self.even
        } else {
            &self.odd
        }
    }
}

/// Kernel smoother with a fixed radius in cells.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use glyphgrid_aggregate::Grid;
/// use glyphgrid_core::CellIndex;
/// use glyphgrid_smooth::{KernelSmoother, SmoothProperty};
/// use glyphgrid_space::SquareDiscretizer;
///
/// let mut grid = Grid::new(Arc::new(SquareDiscretizer::new(10.0).unwrap()), 0.0, 0.0);
/// grid.get_or_insert(CellIndex::new(0, 0)).set("value", 10.0);
///
/// let report = KernelSmoother::new(2).unwrap()
///     .smooth(&mut grid, &[SmoothProperty::value("value")])
///     .unwrap();
///
/// // The single value spreads into its neighbours.
/// assert!(report.created > 0);
/// assert!(grid.cell(1, 0).unwrap().is_synthetic());
/// assert!(grid.cell(0, 0).unwrap().scalar("value").unwrap() < 10.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernelSmoother {
    radius: u32,
}

/// One staged write.
struct Staged {
    index: CellIndex,
    property: usize,
    value: PropertyValue,
}

impl KernelSmoother {
    /// A smoother of `radius` cells.
    ///
    /// Returns `Err(ConfigError::InvalidKernelRadius)` for radius 0.
    pub fn new(radius: u32) -> Result<Self, ConfigError> {
        if radius == 0 {
            return Err(ConfigError::InvalidKernelRadius { value: radius });
        }
        Ok(Self { radius })
    }

    /// Kernel radius in cells.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Smooth `properties` in place.
    ///
    /// # Errors
    ///
    /// - `Config(MissingSmoothProperties)` when `properties` is empty.
    /// - `KindMismatch` when a cell's value does not match its declared
    ///   kind.
    pub fn smooth(
        &self,
        grid: &mut Grid,
        properties: &[SmoothProperty],
    ) -> Result<SmoothReport, SmoothError> {
        if properties.is_empty() {
            return Err(ConfigError::MissingSmoothProperties.into());
        }
        check_kinds(grid, properties)?;
        if grid.is_empty() {
            return Ok(SmoothReport::default());
        }
        let targets = sweep_targets(grid, self.radius);
        let weights = KernelWeights::new(grid.discretizer(), self.radius);

        let mut staged = Vec::new();
        for (pi, p) in properties.iter().enumerate() {
            for &index in &targets {
                let offsets = weights.for_column(index.col);
                let value = match p.kind {
                    PropertyKind::Value => smooth_scalar(grid, &p.name, index, offsets),
                    PropertyKind::Array => smooth_array(grid, &p.name, index, offsets),
                };
                if let Some(value) = value {
                    if grid.contains(index) || !is_zero(&value) {
                        staged.push(Staged {
                            index,
                            property: pi,
                            value,
                        });
                    }
                }
            }
        }

        let mut report = SmoothReport::default();
        for s in staged {
            if !grid.contains(s.index) {
                report.created += 1;
            }
            grid.get_or_insert_synthetic(s.index)
                .set(properties[s.property].name.as_str(), s.value);
            report.written += 1;
        }
        log::debug!(
            "kernel smoothing r={} over {} properties: {} values written, {} synthetic cells",
            self.radius,
            properties.len(),
            report.written,
            report.created
        );
        Ok(report)
    }
}

/// Every populated cell plus every index within `radius` cells of one,
/// in column-major order.
fn sweep_targets(grid: &Grid, radius: u32) -> BTreeSet<CellIndex> {
    let r = radius.min(i32::MAX as u32) as i32;
    let mut targets = BTreeSet::new();
    for &index in grid.indices() {
        for dc in -r..=r {
            for dr in -r..=r {
                targets.insert(index.offset(dc, dr));
            }
        }
    }
    targets
}

fn scalar_at(grid: &Grid, name: &str, index: CellIndex) -> f64 {
    grid.get(index)
        .and_then(|c| c.scalar(name))
        .filter(|v| !v.is_nan())
        .unwrap_or(0.0)
}

fn smooth_scalar(
    grid: &Grid,
    name: &str,
    index: CellIndex,
    offsets: &[(i32, i32, f64)],
) -> Option<PropertyValue> {
    let mut sum = 0.0;
    let mut cum_w = 0.0;
    for &(dc, dr, w) in offsets {
        sum += scalar_at(grid, name, index.offset(dc, dr)) * w;
        cum_w += w;
    }
    if cum_w <= 0.0 {
        return None;
    }
    let v = sum / cum_w;
    v.is_finite().then_some(PropertyValue::Scalar(v))
}

fn smooth_array(
    grid: &Grid,
    name: &str,
    index: CellIndex,
    offsets: &[(i32, i32, f64)],
) -> Option<PropertyValue> {
    let mut sums: Vec<f64> = Vec::new();
    let mut cum_w = 0.0;
    for &(dc, dr, w) in offsets {
        cum_w += w;
        let Some(values) = grid
            .get(index.offset(dc, dr))
            .and_then(|c| c.get(name))
            .and_then(PropertyValue::as_array)
        else {
            continue;
        };
        if sums.len() < values.len() {
            sums.resize(values.len(), 0.0);
        }
        for (s, v) in sums.iter_mut().zip(values) {
            if !v.is_nan() {
                *s += v * w;
            }
        }
    }
    if cum_w <= 0.0 || sums.is_empty() {
        return None;
    }
    let out: Vec<f64> = sums.into_iter().map(|s| s / cum_w).collect();
    out.iter()
        .all(|v| v.is_finite())
        .then_some(PropertyValue::Array(out))
}

fn is_zero(value: &PropertyValue) -> bool {
    match value {
        PropertyValue::Scalar(v) => *v == 0.0,
        PropertyValue::Array(v) => v.iter().all(|x| *x == 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphgrid_test_utils::{hex, sparse_grid, square, uniform_grid};
    use proptest::prelude::*;

    fn value() -> [SmoothProperty; 1] {
        [SmoothProperty::value("v")]
    }

    // ── Weights ─────────────────────────────────────────────────

    #[test]
    fn weight_is_one_at_zero_and_zero_at_radius() {
        assert_eq!(kernel_weight(0.0, 3.0), 1.0);
        assert_eq!(kernel_weight(3.0, 3.0), 0.0);
        assert_eq!(kernel_weight(4.0, 3.0), 0.0);
        assert_eq!(kernel_weight(1.0, 3.0), 0.5);
    }

    #[test]
    fn radius_one_on_squares_keeps_only_the_centre() {
        let w = KernelWeights::new(square(10.0).as_ref(), 1);
        assert_eq!(w.for_column(0), &[(0, 0, 1.0)]);
    }

    #[test]
    fn hex_weights_are_symmetric_between_parities() {
        // The set of weights must be the same whichever parity the
        // target column has; only the row offsets move.
        let w = KernelWeights::new(hex(20.0).as_ref(), 3);
        let mut even: Vec<f64> = w.for_column(0).iter().map(|o| o.2).collect();
        let mut odd: Vec<f64> = w.for_column(1).iter().map(|o| o.2).collect();
        even.sort_by(f64::total_cmp);
        odd.sort_by(f64::total_cmp);
        assert_eq!(even.len(), odd.len());
        for (a, b) in even.iter().zip(&odd) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn hex_even_column_uses_geometric_neighbours() {
        let d = hex(20.0);
        let w = KernelWeights::new(d.as_ref(), 2);
        for col in [0, 1, -2, -1] {
            let origin = CellIndex::new(col, 0);
            let o = d.index_to_center_unit_scale(origin);
            for &(dc, dr, weight) in w.for_column(col) {
                let n = d.index_to_center_unit_scale(origin.offset(dc, dr));
                let expect = kernel_weight(o.distance(&n), 2.0);
                assert!(
                    (weight - expect).abs() < 1e-12,
                    "col {col} offset ({dc}, {dr}): {weight} vs {expect}"
                );
            }
        }
    }

    #[test]
    fn rejects_zero_radius() {
        assert_eq!(
            KernelSmoother::new(0),
            Err(ConfigError::InvalidKernelRadius { value: 0 })
        );
    }

    // ── Smoothing ───────────────────────────────────────────────

    #[test]
    fn requires_properties() {
        let mut g = sparse_grid(square(10.0), "v", &[((0, 0), 1.0)]);
        let e = KernelSmoother::new(2).unwrap().smooth(&mut g, &[]).unwrap_err();
        assert_eq!(e, SmoothError::Config(ConfigError::MissingSmoothProperties));
    }

    #[test]
    fn empty_grid_is_a_no_op() {
        let mut g = sparse_grid(square(10.0), "v", &[]);
        let r = KernelSmoother::new(2).unwrap().smooth(&mut g, &value()).unwrap();
        assert_eq!(r, SmoothReport::default());
        assert!(g.is_empty());
    }

    #[test]
    fn uniform_field_interior_is_unchanged() {
        for d in [square(10.0), hex(20.0)] {
            let mut g = uniform_grid(d, CellIndex::new(-6, -6), CellIndex::new(6, 6), "v", 4.0);
            KernelSmoother::new(3).unwrap().smooth(&mut g, &value()).unwrap();
            for col in -3..=3 {
                for row in -3..=3 {
                    let v = g.cell(col, row).unwrap().scalar("v").unwrap();
                    assert!((v - 4.0).abs() < 1e-12, "({col}, {row}) = {v}");
                }
            }
        }
    }

    #[test]
    fn values_bleed_into_synthetic_cells() {
        let mut g = sparse_grid(square(10.0), "v", &[((0, 0), 9.0)]);
        let r = KernelSmoother::new(2).unwrap().smooth(&mut g, &value()).unwrap();
        // d < 2 covers the centre, its four edge neighbours and the four
        // diagonals (d = sqrt 2).
        assert_eq!(r.created, 8);
        assert_eq!(g.len(), 9);
        assert!(!g.cell(0, 0).unwrap().is_synthetic());
        assert!(g.cell(1, 1).unwrap().is_synthetic());
        assert!(g.cell(2, 0).is_none());
        let centre = g.cell(0, 0).unwrap().scalar("v").unwrap();
        let edge = g.cell(1, 0).unwrap().scalar("v").unwrap();
        let diag = g.cell(1, 1).unwrap().scalar("v").unwrap();
        assert!(centre > edge && edge > diag && diag > 0.0);
    }

    #[test]
    fn distant_cells_smooth_independently() {
        let far = 4000;
        let mut g = sparse_grid(square(10.0), "v", &[((0, 0), 9.0), ((far, far), 9.0)]);
        let r = KernelSmoother::new(1).unwrap().smooth(&mut g, &value()).unwrap();
        assert_eq!((r.written, r.created), (2, 0));

        let r = KernelSmoother::new(2).unwrap().smooth(&mut g, &value()).unwrap();
        assert_eq!(r.created, 16);
        assert_eq!(g.len(), 18);
        assert!(g.indices().all(|i| {
            let near = |c: i32, row: i32| (i.col - c).abs() <= 1 && (i.row - row).abs() <= 1;
            near(0, 0) || near(far, far)
        }));
    }

    #[test]
    fn sweep_targets_surround_populated_cells() {
        let g = sparse_grid(hex(20.0), "v", &[((0, 0), 1.0), ((100, -50), 1.0)]);
        let t = sweep_targets(&g, 2);
        assert_eq!(t.len(), 2 * 25);
        assert!(t.contains(&CellIndex::new(-2, 2)));
        assert!(t.contains(&CellIndex::new(102, -52)));
        assert!(!t.contains(&CellIndex::new(50, -25)));
    }

    #[test]
    fn sweep_reads_unsmoothed_neighbours() {
        // Two separate smoothings of mirror-image inputs must mirror;
        // in-place updates would bias toward the sweep direction.
        let mut a = sparse_grid(square(10.0), "v", &[((0, 0), 5.0), ((1, 0), 1.0)]);
        let mut b = sparse_grid(square(10.0), "v", &[((0, 0), 1.0), ((1, 0), 5.0)]);
        let k = KernelSmoother::new(2).unwrap();
        k.smooth(&mut a, &value()).unwrap();
        k.smooth(&mut b, &value()).unwrap();
        let a0 = a.cell(0, 0).unwrap().scalar("v").unwrap();
        let b1 = b.cell(1, 0).unwrap().scalar("v").unwrap();
        assert!((a0 - b1).abs() < 1e-12);
    }

    #[test]
    fn nan_inputs_never_produce_nan() {
        let mut g = sparse_grid(square(10.0), "v", &[((0, 0), f64::NAN), ((1, 0), 2.0)]);
        KernelSmoother::new(2).unwrap().smooth(&mut g, &value()).unwrap();
        assert!(g
            .iter()
            .filter_map(|c| c.scalar("v"))
            .all(|v| v.is_finite()));
    }

    #[test]
    fn untouched_properties_are_preserved() {
        let mut g = sparse_grid(square(10.0), "v", &[((0, 0), 3.0)]);
        g.get_or_insert(CellIndex::new(0, 0)).set("label", 7.0);
        KernelSmoother::new(2).unwrap().smooth(&mut g, &value()).unwrap();
        assert_eq!(g.cell(0, 0).unwrap().scalar("label"), Some(7.0));
        assert!(g.cell(1, 0).unwrap().get("label").is_none());
    }

    #[test]
    fn arrays_smooth_elementwise_over_longest_length() {
        let mut g = sparse_grid(square(10.0), "unused", &[]);
        g.get_or_insert(CellIndex::new(0, 0)).set("bins", vec![4.0, 8.0]);
        g.get_or_insert(CellIndex::new(0, 1)).set("bins", vec![4.0]);
        let k = KernelSmoother::new(2).unwrap();
        k.smooth(&mut g, &[SmoothProperty::array("bins")]).unwrap();
        let bins = g.cell(0, 0).unwrap().get("bins").unwrap().as_array().unwrap().to_vec();
        assert_eq!(bins.len(), 2);
        assert!(bins[0] > 0.0 && bins[1] > 0.0);
        assert!(g.cell(-1, -1).unwrap().is_synthetic());
    }

    #[test]
    fn kind_mismatch_fails_before_writing() {
        let mut g = sparse_grid(square(10.0), "v", &[((0, 0), 3.0)]);
        let before = g.clone();
        let e = KernelSmoother::new(2)
            .unwrap()
            .smooth(&mut g, &[SmoothProperty::array("v")])
            .unwrap_err();
        assert!(matches!(e, SmoothError::KindMismatch { .. }));
        assert_eq!(g.len(), before.len());
        assert_eq!(g.cell(0, 0), before.cell(0, 0));
    }

    proptest! {
        #[test]
        fn weight_is_non_increasing(r in 1u32..12, a in 0.0f64..15.0, b in 0.0f64..15.0) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            let r = r as f64;
            prop_assert!(kernel_weight(near, r) >= kernel_weight(far, r));
            prop_assert!(kernel_weight(near, r) >= 0.0);
        }

        #[test]
        fn smoothed_values_stay_within_input_range(
            cells in proptest::collection::vec(((-5i32..5, -5i32..5), 0.0f64..100.0), 1..20),
        ) {
            let mut g = sparse_grid(square(10.0), "v", &cells);
            let max = g.iter().filter_map(|c| c.scalar("v")).fold(0.0, f64::max);
            KernelSmoother::new(3).unwrap().smooth(&mut g, &value()).unwrap();
            for c in g.iter() {
                let v = c.scalar("v").unwrap_or(0.0);
                prop_assert!(v.is_finite() && v >= 0.0 && v <= max + 1e-9);
            }
        }
    }
}
