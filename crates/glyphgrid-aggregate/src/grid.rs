//! Sparse cell collection produced by one aggregation pass.

use crate::cell::{Cell, CellGeometry};
use glyphgrid_core::{CellIndex, Tessellation};
use glyphgrid_space::Discretizer;
use std::collections::btree_map::{self, BTreeMap};
use std::sync::Arc;

/// Sparse grid of populated cells.
///
/// Indices may be negative and are unbounded; only cells that received
/// data (or a non-zero smoothing result) exist. Iteration is column-major:
/// ascending column, then ascending row.
///
/// A `Grid` belongs to one pass. The driver builds a fresh one every
/// time, so values from an earlier pass can never leak into a later one.
#[derive(Clone)]
pub struct Grid {
    discretizer: Arc<dyn Discretizer>,
    cells: BTreeMap<CellIndex, Cell>,
    x_offset: f64,
    y_offset: f64,
}

impl Grid {
    /// An empty grid whose tessellation origin is shifted by the offsets.
    pub fn new(discretizer: Arc<dyn Discretizer>, x_offset: f64, y_offset: f64) -> Self {
        Self {
            discretizer,
            cells: BTreeMap::new(),
            x_offset,
            y_offset,
        }
    }

    /// The discretizer that indexes this grid.
    pub fn discretizer(&self) -> &dyn Discretizer {
        self.discretizer.as_ref()
    }

    /// Shared handle to the discretizer.
    pub fn discretizer_arc(&self) -> &Arc<dyn Discretizer> {
        &self.discretizer
    }

    /// Tessellation tag used by smoothers to pick a distance metric.
    pub fn tessellation(&self) -> Tessellation {
        self.discretizer.tessellation()
    }

    /// Nominal cell size in pixels.
    pub fn cell_size(&self) -> f64 {
        self.discretizer.cell_size()
    }

    /// Horizontal shift of the tessellation origin in pixels.
    pub fn x_offset(&self) -> f64 {
        self.x_offset
    }

    /// Vertical shift of the tessellation origin in pixels.
    pub fn y_offset(&self) -> f64 {
        self.y_offset
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is populated.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `index` is populated.
    pub fn contains(&self, index: CellIndex) -> bool {
        self.cells.contains_key(&index)
    }

    /// The cell at `index`, if populated.
    pub fn get(&self, index: CellIndex) -> Option<&Cell> {
        self.cells.get(&index)
    }

    /// The cell at `(col, row)`, if populated.
    pub fn cell(&self, col: i32, row: i32) -> Option<&Cell> {
        self.cells.get(&CellIndex::new(col, row))
    }

    /// Mutable access to the cell at `index`, if populated.
    pub fn get_mut(&mut self, index: CellIndex) -> Option<&mut Cell> {
        self.cells.get_mut(&index)
    }

    /// The cell at `index`, created empty if absent.
    pub fn get_or_insert(&mut self, index: CellIndex) -> &mut Cell {
        self.cells.entry(index).or_insert_with(|| Cell::new(index))
    }

    /// The cell at `index`, created as a synthetic cell if absent.
    pub fn get_or_insert_synthetic(&mut self, index: CellIndex) -> &mut Cell {
        self.cells
            .entry(index)
            .or_insert_with(|| Cell::synthetic(index))
    }

    /// Populated cells in column-major order.
    pub fn iter(&self) -> btree_map::Values<'_, CellIndex, Cell> {
        self.cells.values()
    }

    /// Mutable populated cells in column-major order.
    pub fn iter_mut(&mut self) -> btree_map::ValuesMut<'_, CellIndex, Cell> {
        self.cells.values_mut()
    }

    /// Populated indices in column-major order.
    pub fn indices(&self) -> btree_map::Keys<'_, CellIndex, Cell> {
        self.cells.keys()
    }

    /// Geometry handle for `index`, whether or not it is populated.
    pub fn geometry(&self, index: CellIndex) -> CellGeometry<'_> {
        CellGeometry::new(
            self.discretizer.as_ref(),
            index,
            self.x_offset,
            self.y_offset,
        )
    }

    /// Populated cells paired with their geometry.
    pub fn cells_with_geometry(&self) -> impl Iterator<Item = (&Cell, CellGeometry<'_>)> {
        self.cells.values().map(|c| (c, self.geometry(c.index())))
    }

    /// Smallest index rectangle containing every populated cell, as
    /// inclusive `(min, max)` corners.
    pub fn bounds(&self) -> Option<(CellIndex, CellIndex)> {
        let first = self.cells.keys().next()?;
        let last = self.cells.keys().next_back()?;
        let (min_row, max_row) = self
            .cells
            .keys()
            .fold((i32::MAX, i32::MIN), |(lo, hi), i| (lo.min(i.row), hi.max(i.row)));
        Some((
            CellIndex::new(first.col, min_row),
            CellIndex::new(last.col, max_row),
        ))
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("tessellation", &self.tessellation())
            .field("cell_size", &self.cell_size())
            .field("x_offset", &self.x_offset)
            .field("y_offset", &self.y_offset)
            .field("cells", &self.cells.len())
            .finish()
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = &'a Cell;
    type IntoIter = btree_map::Values<'a, CellIndex, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
