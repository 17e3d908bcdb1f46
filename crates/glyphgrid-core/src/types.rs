//! Coordinates, cell indices, and the tessellation tag.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A position in the continuous reference space.
///
/// At aggregation time this is screen pixels; world coordinates use the
/// same type before they pass through a projection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component (grows downward in screen space).
    pub y: f64,
}

impl Point {
    /// Construct a point from its components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `true` if neither component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Shift by `(dx, dy)`.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Integer `(col, row)` address of a cell within a tessellation.
///
/// Indices are signed: points left of or above the tessellation origin
/// map to negative columns and rows. Discretizers keep both components
/// within `±CellIndex::LIMIT`, which leaves headroom for neighbour
/// arithmetic without overflowing `i32`.
///
/// Ordering is column-major (`col` first, then `row`), which is also the
/// order in which an aggregated grid yields its cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex {
    /// Column (x axis).
    pub col: i32,
    /// Row (y axis).
    pub row: i32,
}

impl CellIndex {
    /// Largest component magnitude a discretizer produces.
    pub const LIMIT: i32 = 1 << 28;

    /// Construct an index from its components.
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Floor `v` to an index component, clamped to `±LIMIT`.
    ///
    /// NaN maps to 0.
    pub fn component(v: f64) -> i32 {
        let limit = Self::LIMIT as f64;
        if v.is_nan() {
            return 0;
        }
        v.floor().clamp(-limit, limit) as i32
    }

    /// `true` if both components lie strictly inside `±LIMIT`.
    pub fn in_range(&self) -> bool {
        self.col.abs() < Self::LIMIT && self.row.abs() < Self::LIMIT
    }

    /// The index `(col + dc, row + dr)`, saturating at the `i32` range.
    pub fn offset(&self, dc: i32, dr: i32) -> Self {
        Self::new(self.col.saturating_add(dc), self.row.saturating_add(dr))
    }

    /// The index `(col + dc, row + dr)`, or `None` on overflow.
    pub fn checked_offset(&self, dc: i32, dr: i32) -> Option<Self> {
        Some(Self::new(self.col.checked_add(dc)?, self.row.checked_add(dr)?))
    }

    /// Column parity, `0` for even and `1` for odd, including negative columns.
    pub fn col_parity(&self) -> i32 {
        self.col.rem_euclid(2)
    }
}

impl From<(i32, i32)> for CellIndex {
    fn from((col, row): (i32, i32)) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// The shape of the cells that partition the plane.
///
/// Smoothers read this tag off a grid to choose between square-cell
/// and hex-centre distance metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tessellation {
    /// Axis-aligned squares.
    Grid,
    /// Flat-top hexagons in an odd-column-offset layout.
    Hex,
}

impl Tessellation {
    /// The selector string accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Hex => "hex",
        }
    }
}

impl fmt::Display for Tessellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tessellation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(Self::Grid),
            "hex" => Ok(Self::Hex),
            other => Err(ConfigError::UnknownTessellation {
                name: other.to_string(),
            }),
        }
    }
}
