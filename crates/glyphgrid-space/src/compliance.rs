//! Discretizer trait compliance test helpers.
//!
//! These functions verify that a Discretizer implementation satisfies the
//! invariants required by the trait contract. Reused across all backend
//! test modules (Square, Hex).

use crate::discretizer::Discretizer;
use glyphgrid_core::{CellIndex, Point};
use indexmap::IndexSet;

/// Index window exercised by every check, including negative indices.
const SPAN: i32 = 6;

fn window() -> impl Iterator<Item = CellIndex> {
    (-SPAN..=SPAN).flat_map(|col| (-SPAN..=SPAN).map(move |row| CellIndex::new(col, row)))
}

fn bbox(points: &[Point]) -> (Point, Point) {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min, max)
}

fn expected_corners(d: &dyn Discretizer) -> usize {
    match d.tessellation() {
        glyphgrid_core::Tessellation::Grid => 4,
        glyphgrid_core::Tessellation::Hex => 6,
    }
}

/// Assert that `coordinate_to_index(index_to_center(i)) == i`.
pub fn assert_center_round_trip(d: &dyn Discretizer) {
    for i in window() {
        let c = d.index_to_center(i);
        let back = d.coordinate_to_index(c);
        assert_eq!(back, i, "center {c:?} of {i} maps back to {back}");
    }
}

/// Assert that distinct cells have distinct centres.
pub fn assert_centers_unique(d: &dyn Discretizer) {
    let centers: IndexSet<(u64, u64)> = window()
        .map(|i| {
            let c = d.index_to_center(i);
            (c.x.to_bits(), c.y.to_bits())
        })
        .collect();
    assert_eq!(
        centers.len(),
        window().count(),
        "two cells share a centre"
    );
}

/// Assert the boundary has the tessellation's corner count and its
/// bounding box contains the centre.
pub fn assert_boundary_encloses_center(d: &dyn Discretizer) {
    let n = expected_corners(d);
    for i in window() {
        let b = d.index_to_boundary(i, 0.0);
        assert_eq!(b.len(), n, "boundary of {i} has {} corners", b.len());
        let (min, max) = bbox(&b);
        let c = d.index_to_center(i);
        assert!(
            min.x <= c.x && c.x <= max.x && min.y <= c.y && c.y <= max.y,
            "centre {c:?} of {i} outside boundary bbox {min:?}..{max:?}"
        );
    }
}

/// Assert a padded boundary never extends past the unpadded one.
pub fn assert_padding_shrinks(d: &dyn Discretizer) {
    let pad = d.cell_size() / 8.0;
    for i in window() {
        let (omin, omax) = bbox(&d.index_to_boundary(i, 0.0));
        let (pmin, pmax) = bbox(&d.index_to_boundary(i, pad));
        assert!(
            pmin.x >= omin.x && pmin.y >= omin.y && pmax.x <= omax.x && pmax.y <= omax.y,
            "padded boundary of {i} escapes the full cell"
        );
    }
}

/// Assert that unit-scale centres keep the same column-major order as
/// pixel centres.
pub fn assert_unit_scale_is_monotone(d: &dyn Discretizer) {
    for i in window() {
        let a = d.index_to_center_unit_scale(i);
        let right = d.index_to_center_unit_scale(i.offset(1, 0));
        let below = d.index_to_center_unit_scale(i.offset(0, 1));
        assert!(right.x > a.x, "unit-scale x not increasing at {i}");
        assert!(below.y > a.y, "unit-scale y not increasing at {i}");
    }
}

/// Assert that two calls return identical results.
pub fn assert_deterministic(d: &dyn Discretizer) {
    for i in window() {
        assert_eq!(d.index_to_center(i), d.index_to_center(i));
        assert_eq!(d.index_to_boundary(i, 1.0), d.index_to_boundary(i, 1.0));
    }
}

/// Run all compliance checks on a discretizer.
pub fn run_full_compliance(d: &dyn Discretizer) {
    assert!(d.cell_size() > 0.0, "cell size must be positive");
    assert_center_round_trip(d);
    assert_centers_unique(d);
    assert_boundary_encloses_center(d);
    assert_padding_shrinks(d);
    assert_unit_scale_is_monotone(d);
    assert_deterministic(d);
}
