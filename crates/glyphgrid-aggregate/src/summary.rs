//! Diagnostics returned alongside the grid.

use crate::grid::Grid;
use glyphgrid_core::{DatumError, Point};

/// World-space rectangle covered by the configured viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldExtent {
    /// Smallest world x and y over the viewport corners.
    pub min: Point,
    /// Largest world x and y over the viewport corners.
    pub max: Point,
}

/// What happened during one aggregation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregationSummary {
    /// Data examined, including skipped ones.
    pub processed: usize,
    /// `(cell, datum)` assignments handed to the aggregators.
    pub assignments: usize,
    /// Position in the input and reason for every skipped datum.
    pub skipped: Vec<(usize, DatumError)>,
    /// Viewport extent, when a viewport was configured.
    pub world_extent: Option<WorldExtent>,
}

impl AggregationSummary {
    /// Number of skipped data.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Whether every datum was placed.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Result of one aggregation pass.
#[derive(Debug)]
pub struct AggregationOutput {
    /// Freshly built grid.
    pub grid: Grid,
    /// Pass diagnostics.
    pub summary: AggregationSummary,
}
