//! Reusable aggregator test fixtures.
//!
//! Three standard aggregators for driver and pipeline testing:
//!
//! - [`CountAggregator`]: accumulates `count` and weighted `sum`.
//! - [`ConstAggregator`]: sets one property to a constant.
//! - [`RecordingAggregator`]: logs every call it receives.

use glyphgrid_aggregate::{Aggregator, Cell, Context};
use glyphgrid_core::CellIndex;
use std::sync::Mutex;

use crate::Record;

/// Accumulates assignment weight under `count` and `value * weight`
/// under `sum`.
#[derive(Debug, Default)]
pub struct CountAggregator;

impl Aggregator<Record> for CountAggregator {
    fn aggregate(&self, cell: &mut Cell, record: &Record, weight: f64, _ctx: &mut Context) {
        cell.accumulate("count", weight);
        cell.accumulate("sum", record.value * weight);
    }
}

/// Writes a constant to one property of every assigned cell.
#[derive(Debug)]
pub struct ConstAggregator {
    pub property: String,
    pub value: f64,
}

impl ConstAggregator {
    pub fn new(property: impl Into<String>, value: f64) -> Self {
        Self {
            property: property.into(),
            value,
        }
    }
}

impl<R> Aggregator<R> for ConstAggregator {
    fn aggregate(&self, cell: &mut Cell, _record: &R, _weight: f64, _ctx: &mut Context) {
        cell.set(self.property.as_str(), self.value);
    }
}

/// One observed callback.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Pre { cell_size: f64 },
    Aggregate { index: CellIndex, weight: f64 },
    Post { cells: usize, cell_size: f64 },
}

/// Records every callback in order.
///
/// Uses a `Mutex` so the fixture can be shared by reference across
/// the driver's `&self` calls.
#[derive(Debug, Default)]
pub struct RecordingAggregator {
    calls: Mutex<Vec<Call>>,
}

impl RecordingAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// `(index, weight)` of every aggregate call so far.
    pub fn assignments(&self) -> Vec<(CellIndex, f64)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Aggregate { index, weight } => Some((index, weight)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl<R> Aggregator<R> for RecordingAggregator {
    fn pre_aggregate(&self, cell_size: f64, _ctx: &mut Context) {
        self.push(Call::Pre { cell_size });
    }

    fn aggregate(&self, cell: &mut Cell, _record: &R, weight: f64, _ctx: &mut Context) {
        self.push(Call::Aggregate {
            index: cell.index(),
            weight,
        });
    }

    fn post_aggregate(&self, cells: &mut [&mut Cell], cell_size: f64, _ctx: &mut Context) {
        self.push(Call::Post {
            cells: cells.len(),
            cell_size,
        });
    }
}
