//! Datum-to-cell assignment for each [`AssignmentMode`](crate::AssignmentMode).
//!
//! All inputs are screen coordinates already shifted by the grid offsets.

use glyphgrid_core::{CellIndex, Point, Tessellation};
use glyphgrid_space::Discretizer;
use smallvec::{smallvec, SmallVec};

/// `(cell, weight)` pairs produced for one datum.
pub type Assignments = SmallVec<[(CellIndex, f64); 4]>;

/// Sub-grid spacing in pixels for offset oversampling.
pub const OVERSAMPLE_STEP: f64 = 3.0;

/// The containing cell, weight 1.
pub fn single(d: &dyn Discretizer, p: Point) -> Assignments {
    smallvec![(d.coordinate_to_index(p), 1.0)]
}

/// Full-weight samples at `(x + dx - s/2, y + dy - s/2)` for `dx, dy` in
/// `0, 3, 6, … < s`, followed by the point's own cell.
///
/// Repeated indices are kept: a cell receives one assignment per sample
/// that lands in it.
pub fn oversample(d: &dyn Discretizer, p: Point) -> Assignments {
    let s = d.cell_size();
    let steps = (s / OVERSAMPLE_STEP).ceil() as usize;
    let mut out = Assignments::with_capacity(steps * steps + 1);
    for i in 0..steps {
        let dx = i as f64 * OVERSAMPLE_STEP;
        for j in 0..steps {
            let dy = j as f64 * OVERSAMPLE_STEP;
            let q = p.offset(dx - s / 2.0, dy - s / 2.0);
            out.push((d.coordinate_to_index(q), 1.0));
        }
    }
    out.push((d.coordinate_to_index(p), 1.0));
    out
}

/// Signed distance from the cell middle along one axis, as a fraction of
/// the cell size: `-0.5` at the low edge, `0` at the middle, approaching
/// `0.5` at the high edge.
fn axis_offset(fraction: f64) -> f64 {
    fraction - 0.5
}

fn toward(offset: f64) -> i32 {
    if offset < 0.0 {
        -1
    } else {
        1
    }
}

/// Weights `[own, diagonal, horizontal, vertical]` for a point at
/// fractional position `(fx, fy)` inside its cell.
///
/// Raw weights are `1 - (|ox| + |oy|) / 2`, `(|ox| + |oy|) / 2`, `|ox|`
/// and `|oy|`, where `o` is the offset from the cell middle. They are
/// divided by their total `1 + |ox| + |oy|` so that they sum to 1.
pub fn maup_weights(fx: f64, fy: f64) -> [f64; 4] {
    let ax = axis_offset(fx).abs();
    let ay = axis_offset(fy).abs();
    let total = 1.0 + ax + ay;
    [
        (1.0 - (ax + ay) / 2.0) / total,
        ((ax + ay) / 2.0) / total,
        ax / total,
        ay / total,
    ]
}

/// Four fractional assignments: own cell, the diagonal neighbour in the
/// direction of the nearest corner, and the horizontal and vertical
/// neighbours toward the nearest edges. Weights sum to 1.
///
/// Only meaningful on square tessellations; the driver rejects this mode
/// on hex grids before any datum is processed.
pub fn reduce_maup(d: &dyn Discretizer, p: Point) -> Assignments {
    let s = d.cell_size();
    let own = d.coordinate_to_index(p);
    let fx = (p.x - own.col as f64 * s) / s;
    let fy = (p.y - own.row as f64 * s) / s;
    let dc = toward(axis_offset(fx));
    let dr = toward(axis_offset(fy));
    let [w_own, w_diag, w_h, w_v] = maup_weights(fx, fy);
    smallvec![
        (own, w_own),
        (own.offset(dc, dr), w_diag),
        (own.offset(dc, 0), w_h),
        (own.offset(0, dr), w_v),
    ]
}

/// Every cell covered by the screen-space box `min..max`, weight 1.
///
/// On squares the covered range is `floor(min / s) .. ceil(max / s)`
/// (exclusive) per axis, so a zero-width box lying exactly on a cell
/// edge covers nothing. On hexes it is the index rectangle spanned by the
/// cells containing the two corners, and a box with zero area covers
/// nothing. Callers fall back to the feature's centroid when the result
/// is empty.
pub fn feature_cells(d: &dyn Discretizer, min: Point, max: Point) -> Assignments {
    let (cols, rows) = match d.tessellation() {
        Tessellation::Grid => {
            let s = d.cell_size();
            let c0 = CellIndex::component(min.x / s);
            let c1 = CellIndex::component((max.x / s).ceil());
            let r0 = CellIndex::component(min.y / s);
            let r1 = CellIndex::component((max.y / s).ceil());
            (c0..c1, r0..r1)
        }
        Tessellation::Hex => {
            if !(max.x > min.x && max.y > min.y) {
                return Assignments::new();
            }
            let a = d.coordinate_to_index(min);
            let b = d.coordinate_to_index(max);
            (
                a.col.min(b.col)..a.col.max(b.col) + 1,
                a.row.min(b.row)..a.row.max(b.row) + 1,
            )
        }
    };
    cols.flat_map(|c| rows.clone().map(move |r| (CellIndex::new(c, r), 1.0)))
        .collect()
}
