//! Cells and on-demand cell geometry.

use glyphgrid_core::{CellIndex, Point, PropertyMap, PropertyValue};
use glyphgrid_space::{Boundary, Discretizer};

/// One populated cell of a [`Grid`](crate::Grid).
///
/// A cell is created the first time a datum is assigned to its index and
/// lives as long as the grid. Its properties are written by aggregators
/// and smoothers; the driver never interprets them.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    index: CellIndex,
    properties: PropertyMap,
    synthetic: bool,
}

impl Cell {
    /// An empty cell populated by aggregation.
    pub fn new(index: CellIndex) -> Self {
        Self {
            index,
            properties: PropertyMap::new(),
            synthetic: false,
        }
    }

    /// An empty cell created by a smoothing pass.
    pub fn synthetic(index: CellIndex) -> Self {
        Self {
            synthetic: true,
            ..Self::new(index)
        }
    }

    /// The cell's index.
    pub fn index(&self) -> CellIndex {
        self.index
    }

    /// Column of the cell's index.
    pub fn col(&self) -> i32 {
        self.index.col
    }

    /// Row of the cell's index.
    pub fn row(&self) -> i32 {
        self.index.row
    }

    /// Whether the cell was created by smoothing rather than by data.
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// All properties in first-write order.
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Mutable access to all properties.
    pub fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }

    /// Look up a property.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Look up a scalar property.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.properties.get(name).and_then(PropertyValue::as_scalar)
    }

    /// Set a property, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Remove a property, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.properties.shift_remove(name)
    }

    /// Add `delta` to a scalar property, treating a missing or
    /// non-scalar property as zero. Returns the new value.
    pub fn accumulate(&mut self, name: &str, delta: f64) -> f64 {
        let sum = self.scalar(name).unwrap_or(0.0) + delta;
        match self.properties.get_mut(name) {
            Some(v) => *v = PropertyValue::Scalar(sum),
            None => {
                self.properties
                    .insert(name.to_string(), PropertyValue::Scalar(sum));
            }
        }
        sum
    }
}

/// Geometry of one cell, computed on demand from the grid's discretizer.
///
/// Centre and boundary are shifted by the grid offsets, so they are in
/// the same screen space as the data that was aggregated.
#[derive(Clone, Copy)]
pub struct CellGeometry<'g> {
    discretizer: &'g dyn Discretizer,
    index: CellIndex,
    x_offset: f64,
    y_offset: f64,
}

impl<'g> CellGeometry<'g> {
    pub(crate) fn new(
        discretizer: &'g dyn Discretizer,
        index: CellIndex,
        x_offset: f64,
        y_offset: f64,
    ) -> Self {
        Self {
            discretizer,
            index,
            x_offset,
            y_offset,
        }
    }

    /// The cell's index.
    pub fn index(&self) -> CellIndex {
        self.index
    }

    /// Cell polygon in screen space, inset by `padding`.
    pub fn boundary(&self, padding: f64) -> Boundary {
        let mut b = self.discretizer.index_to_boundary(self.index, padding);
        for p in b.iter_mut() {
            *p = p.offset(self.x_offset, self.y_offset);
        }
        b
    }

    /// Cell centre in screen space.
    pub fn center(&self) -> Point {
        self.discretizer
            .index_to_center(self.index)
            .offset(self.x_offset, self.y_offset)
    }

    /// Nominal cell size in pixels.
    pub fn cell_size(&self) -> f64 {
        self.discretizer.cell_size()
    }
}

impl std::fmt::Debug for CellGeometry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellGeometry")
            .field("tessellation", &self.discretizer.tessellation())
            .field("index", &self.index)
            .field("x_offset", &self.x_offset)
            .field("y_offset", &self.y_offset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphgrid_space::SquareDiscretizer;

    #[test]
    fn accumulate_starts_from_zero() {
        let mut c = Cell::new(CellIndex::new(1, 2));
        assert_eq!(c.accumulate("count", 1.0), 1.0);
        assert_eq!(c.accumulate("count", 0.5), 1.5);
        assert_eq!(c.scalar("count"), Some(1.5));
    }

    #[test]
    fn accumulate_replaces_array_with_scalar() {
        let mut c = Cell::new(CellIndex::new(0, 0));
        c.set("v", vec![1.0, 2.0]);
        assert_eq!(c.accumulate("v", 3.0), 3.0);
    }

    #[test]
    fn synthetic_flag() {
        assert!(!Cell::new(CellIndex::new(0, 0)).is_synthetic());
        assert!(Cell::synthetic(CellIndex::new(0, 0)).is_synthetic());
    }

    #[test]
    fn remove_preserves_order() {
        let mut c = Cell::new(CellIndex::new(0, 0));
        c.set("a", 1.0);
        c.set("b", 2.0);
        c.set("c", 3.0);
        c.remove("b");
        let keys: Vec<_> = c.properties().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn geometry_applies_offsets() {
        let d = SquareDiscretizer::new(20.0).unwrap();
        let g = CellGeometry::new(&d, CellIndex::new(0, 0), 5.0, -3.0);
        assert_eq!(g.center(), Point::new(15.0, 7.0));
        assert_eq!(g.boundary(0.0)[0], Point::new(5.0, -3.0));
        assert_eq!(g.cell_size(), 20.0);
    }
}
