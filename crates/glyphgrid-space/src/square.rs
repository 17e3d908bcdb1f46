//! Axis-aligned square tessellation.

use crate::discretizer::{Boundary, Discretizer};
use glyphgrid_core::{CellIndex, ConfigError, Point, Tessellation};
use smallvec::smallvec;

/// Square cells of side `cell_size`, with cell `(0, 0)` spanning
/// `[0, s) x [0, s)`.
///
/// A coordinate lying exactly on a multiple of `s` belongs to the higher
/// index on that axis.
///
/// # Examples
///
/// ```
/// use glyphgrid_core::{CellIndex, Point};
/// use glyphgrid_space::{Discretizer, SquareDiscretizer};
///
/// let d = SquareDiscretizer::new(20.0).unwrap();
/// assert_eq!(d.coordinate_to_index(Point::new(60.0, 65.0)), CellIndex::new(3, 3));
/// assert_eq!(d.index_to_center(CellIndex::new(0, 0)), Point::new(10.0, 10.0));
/// assert_eq!(d.index_to_boundary(CellIndex::new(0, 0), 0.0).len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct SquareDiscretizer {
    cell_size: f64,
}

impl SquareDiscretizer {
    /// Create a square discretizer.
    ///
    /// Returns `Err(ConfigError::InvalidCellSize)` unless `cell_size` is
    /// finite and strictly positive.
    pub fn new(cell_size: f64) -> Result<Self, ConfigError> {
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return Err(ConfigError::InvalidCellSize { value: cell_size });
        }
        Ok(Self { cell_size })
    }
}

impl Discretizer for SquareDiscretizer {
    fn tessellation(&self) -> Tessellation {
        Tessellation::Grid
    }

    fn cell_size(&self) -> f64 {
        self.cell_size
    }

    fn coordinate_to_index(&self, point: Point) -> CellIndex {
        CellIndex::new(
            CellIndex::component(point.x / self.cell_size),
            CellIndex::component(point.y / self.cell_size),
        )
    }

    fn index_to_center(&self, index: CellIndex) -> Point {
        let s = self.cell_size;
        Point::new(index.col as f64 * s + s / 2.0, index.row as f64 * s + s / 2.0)
    }

    fn index_to_boundary(&self, index: CellIndex, padding: f64) -> Boundary {
        let s = self.cell_size;
        let p = padding.clamp(0.0, s / 2.0);
        let x0 = index.col as f64 * s + p;
        let y0 = index.row as f64 * s + p;
        let x1 = (index.col as f64 + 1.0) * s - p;
        let y1 = (index.row as f64 + 1.0) * s - p;
        smallvec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    fn index_to_center_unit_scale(&self, index: CellIndex) -> Point {
        Point::new(index.col as f64 + 0.5, index.row as f64 + 0.5)
    }
}
