//! Benchmark profiles for the glyphgrid engine.
//!
//! Provides deterministic inputs shared by the criterion benches:
//!
//! - [`reference_samples`]: clustered sample cloud over a 1280x720 viewport
//! - [`reference_config`]: 20px cells with the viewport configured
//! - [`populated_grid`]: an aggregated mean heatmap, ready for smoothing

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use glyphgrid::prelude::*;

/// Reference viewport width in pixels.
pub const VIEWPORT_WIDTH: f64 = 1280.0;

/// Reference viewport height in pixels.
pub const VIEWPORT_HEIGHT: f64 = 720.0;

/// Reference cell size in pixels.
pub const CELL_SIZE: f64 = 20.0;

/// One benchmark datum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Screen x.
    pub x: f64,
    /// Screen y.
    pub y: f64,
    /// Measured value.
    pub value: f64,
}

/// Build `n` samples, half spread uniformly over the viewport and half
/// in eight tight clusters, from a deterministic hash of `seed`.
pub fn reference_samples(n: usize, seed: u64) -> Vec<Sample> {
    let mut state = seed ^ 0x2545_F491_4F6C_DD1D;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..n)
        .map(|i| {
            let (x, y) = if i % 2 == 0 {
                (next() * VIEWPORT_WIDTH, next() * VIEWPORT_HEIGHT)
            } else {
                let c = (i / 2 % 8) as f64;
                let cx = (c + 0.5) * VIEWPORT_WIDTH / 8.0;
                let cy = VIEWPORT_HEIGHT / 2.0 + (c - 3.5) * 40.0;
                (cx + (next() - 0.5) * 120.0, cy + (next() - 0.5) * 120.0)
            };
            Sample {
                x,
                y,
                value: next() * 100.0,
            }
        })
        .collect()
}

/// Reference aggregation settings for `mode`.
pub fn reference_config(mode: AssignmentMode) -> AggregationConfig {
    AggregationConfig::builder()
        .cell_size(CELL_SIZE)
        .mode(mode)
        .viewport(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
        .build()
        .unwrap()
}

/// Where a sample lies.
pub fn locate(s: &Sample) -> Location {
    Location::Point(Point::new(s.x, s.y))
}

/// Mean heatmap over sample values.
pub fn mean_heatmap() -> HeatmapAggregator<Sample> {
    HeatmapAggregator::new(HeatmapKind::Mean, |s: &Sample| s.value)
}

/// Aggregate `n` reference samples into a fresh grid.
pub fn populated_grid(tessellation: Tessellation, n: usize, seed: u64) -> Grid {
    let heatmap = mean_heatmap();
    let mut pass = GlyphPass::new(tessellation, reference_config(AssignmentMode::Single));
    pass.run(
        &reference_samples(n, seed),
        locate,
        &IdentityProjection,
        &[&heatmap],
        &mut Context::new(),
    )
    .unwrap()
    .grid
}
