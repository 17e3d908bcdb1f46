//! The core `Discretizer` trait and `dyn Discretizer` downcast support.

use glyphgrid_core::{CellIndex, Point, Tessellation};
use smallvec::SmallVec;
use std::any::Any;

/// Ordered polygon vertices of one cell.
///
/// Inline capacity covers both backends (4 corners for squares, 6 for
/// hexagons), so boundary queries never touch the heap.
pub type Boundary = SmallVec<[Point; 6]>;

/// Pure mapping between screen coordinates and cells of one tessellation.
///
/// A discretizer is built for a single cell size and is otherwise
/// stateless: every method is a total function of its arguments. The
/// same instance is reused across many aggregation passes as long as the
/// cell size does not change.
///
/// # Object Safety
///
/// Designed for use as `dyn Discretizer`. Grids hold one behind an
/// `Arc`; use `downcast_ref` on the trait object to reach
/// backend-specific methods.
///
/// # Thread Safety
///
/// `Send + Sync` so one instance can serve independent per-tile passes
/// running on different threads.
pub trait Discretizer: Any + Send + Sync + 'static {
    /// Which tessellation this discretizer implements.
    fn tessellation(&self) -> Tessellation;

    /// Nominal cell size in pixels, as passed at construction.
    fn cell_size(&self) -> f64;

    /// The cell containing `point`.
    ///
    /// Index components are clamped to `±CellIndex::LIMIT`, so points far
    /// outside the [`is_addressable`](Self::is_addressable) range share
    /// edge cells. Callers that need distinct cells check first.
    fn coordinate_to_index(&self, point: Point) -> CellIndex;

    /// `true` if `point` maps to an exact, unclamped cell index with room
    /// for neighbour offsets.
    ///
    /// The addressable range is `±LIMIT / 4` cell sizes on both axes,
    /// which keeps every backend's indices well inside the clamp.
    fn is_addressable(&self, point: Point) -> bool {
        let span = CellIndex::LIMIT as f64 / 4.0 * self.cell_size();
        point.x.abs() <= span && point.y.abs() <= span
    }

    /// Centre of the cell in pixels.
    fn index_to_center(&self, index: CellIndex) -> Point;

    /// Cell polygon in clockwise screen order, starting top-left.
    ///
    /// `padding > 0` insets the polygon by roughly that many pixels on
    /// every side. Non-positive padding returns the full cell.
    fn index_to_boundary(&self, index: CellIndex, padding: f64) -> Boundary;

    /// Centre of the cell in a unit-scale layout (cell side length 1).
    ///
    /// Distances between unit-scale centres are independent of the pixel
    /// cell size; smoothers use them to weight neighbours.
    fn index_to_center_unit_scale(&self, index: CellIndex) -> Point;
}

impl dyn Discretizer {
    /// Attempt to downcast a trait object to a concrete backend.
    pub fn downcast_ref<T: Discretizer>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}
