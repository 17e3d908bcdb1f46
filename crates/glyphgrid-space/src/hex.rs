//! Flat-top hexagonal tessellation with an odd-column offset layout.

use crate::discretizer::{Boundary, Discretizer};
use glyphgrid_core::{CellIndex, ConfigError, Point, Tessellation};
use std::collections::HashMap;
use std::sync::Mutex;

/// Corner count of a hexagon.
const CORNERS: usize = 6;

/// Pixel geometry of one hexagon size.
///
/// All lengths are derived from `radius = trunc(cell_size * 1.3 / 2)` so
/// that hexagons cover roughly the same area as squares of the same
/// nominal cell size.
#[derive(Clone, Copy, Debug, PartialEq)]
struct HexParams {
    radius: f64,
    width: f64,
    height: f64,
    side: f64,
    corners_dx: [f64; CORNERS],
    corners_dy: [f64; CORNERS],
}

impl HexParams {
    fn new(cell_size: f64) -> Self {
        let radius = (cell_size * 1.3 / 2.0).trunc().max(0.0);
        let width = radius * 2.0;
        let height = (radius * 3f64.sqrt()).trunc();
        let side = radius * 1.5;
        Self {
            radius,
            width,
            height,
            side,
            // Clockwise from the top-left corner.
            corners_dx: [radius / 2.0, side, width, side, radius / 2.0, 0.0],
            corners_dy: [0.0, 0.0, height / 2.0, height, height, height / 2.0],
        }
    }

    /// Top-left of the bounding box of cell `index`.
    fn origin(&self, index: CellIndex) -> Point {
        Point::new(
            index.col as f64 * self.side,
            self.height * (index.row as f64 + index.col_parity() as f64 / 2.0),
        )
    }
}

/// Hexagonal discretizer.
///
/// Columns are laid out every `1.5 * radius` pixels; odd columns are
/// shifted down by half a hexagon height, giving the six-neighbour
/// topology. Column parity is taken with Euclidean remainder, so negative
/// odd columns are shifted exactly like positive ones.
///
/// Boundary corners are rounded to whole pixels. Padded boundaries are
/// built from a smaller hexagon (cell size reduced by twice the padding)
/// centred on the same point; their geometry is memoised per padding.
///
/// # Examples
///
/// ```
/// use glyphgrid_core::CellIndex;
/// use glyphgrid_space::{Discretizer, HexDiscretizer};
///
/// let hex = HexDiscretizer::new(20.0).unwrap();
/// let i = CellIndex::new(3, -2);
/// assert_eq!(hex.coordinate_to_index(hex.index_to_center(i)), i);
/// assert_eq!(hex.index_to_boundary(i, 0.0).len(), 6);
/// ```
#[derive(Debug)]
pub struct HexDiscretizer {
    cell_size: f64,
    params: HexParams,
    padded: Mutex<HashMap<u64, HexParams>>,
}

impl HexDiscretizer {
    /// Create a hex discretizer.
    ///
    /// Returns `Err(ConfigError::InvalidCellSize)` for non-finite or
    /// non-positive sizes, and `Err(ConfigError::HexTooSmall)` when the
    /// derived radius would be below one pixel.
    pub fn new(cell_size: f64) -> Result<Self, ConfigError> {
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return Err(ConfigError::InvalidCellSize { value: cell_size });
        }
        let params = HexParams::new(cell_size);
        if params.radius < 1.0 || params.height < 1.0 {
            return Err(ConfigError::HexTooSmall { cell_size });
        }
        Ok(Self {
            cell_size,
            params,
            padded: Mutex::new(HashMap::new()),
        })
    }

    /// Circumradius in pixels.
    pub fn radius(&self) -> f64 {
        self.params.radius
    }

    /// Vertical extent of one hexagon in pixels.
    pub fn height(&self) -> f64 {
        self.params.height
    }

    /// Horizontal distance between neighbouring column origins.
    pub fn column_pitch(&self) -> f64 {
        self.params.side
    }

    /// Geometry for a padded boundary, computed once per padding value.
    fn padded_params(&self, padding: f64) -> HexParams {
        let mut memo = self.padded.lock().unwrap_or_else(|e| e.into_inner());
        *memo
            .entry(padding.to_bits())
            .or_insert_with(|| HexParams::new(self.cell_size - padding * 2.0))
    }
}

impl Clone for HexDiscretizer {
    fn clone(&self) -> Self {
        Self {
            cell_size: self.cell_size,
            params: self.params,
            padded: Mutex::new(HashMap::new()),
        }
    }
}

impl Discretizer for HexDiscretizer {
    fn tessellation(&self) -> Tessellation {
        Tessellation::Hex
    }

    fn cell_size(&self) -> f64 {
        self.cell_size
    }

    fn coordinate_to_index(&self, point: Point) -> CellIndex {
        let HexParams {
            radius,
            height,
            side,
            ..
        } = self.params;

        let ci = CellIndex::component(point.x / side);
        let cx = point.x - side * ci as f64;
        let parity = ci.rem_euclid(2);

        let ty = point.y - parity as f64 * height / 2.0;
        let cj = CellIndex::component(ty / height);
        let cy = ty - height * cj as f64;

        // Columns interlock: the left slanted edges of column `ci` reach
        // back into the zig-zag zone owned by column `ci - 1`.
        if cx > (radius / 2.0 - radius * cy / height).abs() {
            CellIndex::new(ci, cj)
        } else {
            let upper = if cy < height / 2.0 { 1 } else { 0 };
            CellIndex::new(ci, cj).offset(-1, parity - upper)
        }
    }

    fn index_to_center(&self, index: CellIndex) -> Point {
        let p = &self.params;
        p.origin(index).offset(p.radius, p.height / 2.0)
    }

    fn index_to_boundary(&self, index: CellIndex, padding: f64) -> Boundary {
        let origin = self.params.origin(index);
        let (shape, shift) = if padding > 0.0 {
            let inner = self.padded_params(padding);
            // Keep the shrunken hexagon centred on the full one.
            let shift = Point::new(
                self.params.radius - inner.radius,
                (self.params.height - inner.height) / 2.0,
            );
            (inner, shift)
        } else {
            (self.params, Point::default())
        };

        (0..CORNERS)
            .map(|k| {
                Point::new(
                    (origin.x + shift.x + shape.corners_dx[k]).round(),
                    (origin.y + shift.y + shape.corners_dy[k]).round(),
                )
            })
            .collect()
    }

    fn index_to_center_unit_scale(&self, index: CellIndex) -> Point {
        let height = 3f64.sqrt();
        let side = 1.5;
        Point::new(
            index.col as f64 * side + 1.0,
            height * (index.row as f64 + index.col_parity() as f64 / 2.0) + height / 2.0,
        )
    }
}
