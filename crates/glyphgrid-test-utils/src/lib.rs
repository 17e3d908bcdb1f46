//! Test fixtures and scenario data for glyphgrid development.
//!
//! Provides a small [`Record`] type, the reference scenario used across
//! crates, deterministic point clouds, and grid builders for smoothing
//! tests. Aggregator fixtures live in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{Call, ConstAggregator, CountAggregator, RecordingAggregator};

use std::sync::Arc;

use glyphgrid_aggregate::Grid;
use glyphgrid_core::{CellIndex, Point};
use glyphgrid_space::{Discretizer, HexDiscretizer, SquareDiscretizer};

/// A located record with one value and one weight.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub weight: f64,
}

impl Record {
    /// A record with weight 1.
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self {
            x,
            y,
            value,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Screen size of the reference scenario.
pub const SCENARIO_SIZE: f64 = 100.0;
/// Cell size of the reference scenario.
pub const SCENARIO_CELL_SIZE: f64 = 20.0;

/// Reference scenario on a 100x100 view with 20px square cells:
/// two records of value 100 in cell `(0, 0)` and one of value 20 in
/// cell `(3, 3)`.
pub fn scenario_records() -> Vec<Record> {
    vec![
        Record::new(10.0, 10.0, 100.0),
        Record::new(15.0, 15.0, 100.0),
        Record::new(60.0, 65.0, 20.0),
    ]
}

/// Deterministic pseudo-random records inside `[0, width) x [0, height)`.
///
/// Uses an integer hash of the record index, so the same `seed` always
/// yields the same cloud on every platform.
pub fn point_cloud(n: usize, width: f64, height: f64, seed: u64) -> Vec<Record> {
    (0..n as u64)
        .map(|i| {
            let h = mix(i.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ seed);
            let fx = (h & 0xFFFF_FFFF) as f64 / 4_294_967_296.0;
            let fy = (h >> 32) as f64 / 4_294_967_296.0;
            let value = (mix(h) % 1000) as f64 / 10.0;
            Record::new(fx * width, fy * height, value)
        })
        .collect()
}

fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

pub fn square(cell_size: f64) -> Arc<dyn Discretizer> {
    Arc::new(SquareDiscretizer::new(cell_size).expect("valid square cell size"))
}

pub fn hex(cell_size: f64) -> Arc<dyn Discretizer> {
    Arc::new(HexDiscretizer::new(cell_size).expect("valid hex cell size"))
}

/// A grid with every cell of the inclusive index rectangle set to
/// `value` under `property`.
pub fn uniform_grid(
    discretizer: Arc<dyn Discretizer>,
    min: CellIndex,
    max: CellIndex,
    property: &str,
    value: f64,
) -> Grid {
    let mut grid = Grid::new(discretizer, 0.0, 0.0);
    for col in min.col..=max.col {
        for row in min.row..=max.row {
            grid.get_or_insert(CellIndex::new(col, row))
                .set(property, value);
        }
    }
    grid
}

/// A grid with the given cells set under `property`.
pub fn sparse_grid(
    discretizer: Arc<dyn Discretizer>,
    property: &str,
    cells: &[((i32, i32), f64)],
) -> Grid {
    let mut grid = Grid::new(discretizer, 0.0, 0.0);
    for &((col, row), value) in cells {
        grid.get_or_insert(CellIndex::new(col, row))
            .set(property, value);
    }
    grid
}
