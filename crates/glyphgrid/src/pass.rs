//! One full aggregation and smoothing cycle.
//!
//! [`GlyphPass`] owns the settings a map layer keeps between redraws and
//! a [`DiscretizerCache`], so consecutive redraws at the same tessellation
//! and cell size share one discretizer. Each [`run()`](GlyphPass::run)
//! builds a fresh grid; nothing from the previous pass leaks into it.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use glyphgrid_aggregate::{
    Aggregation, AggregationConfig, AggregationSummary, Aggregator, Context, Grid, Location,
    Projection,
};
use glyphgrid_core::{ConfigError, Tessellation};
use glyphgrid_smooth::{SmoothError, SmoothReport, SmoothingConfig, SmoothingMethod};
use glyphgrid_space::{Discretizer, DiscretizerCache};

// ── PassError ──────────────────────────────────────────────────────

/// Why a pass produced no grid.
#[derive(Clone, Debug, PartialEq)]
pub enum PassError {
    /// Rejected before any datum was examined.
    Config(ConfigError),
    /// The smoothing stage failed after aggregation.
    Smooth(SmoothError),
}

impl fmt::Display for PassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Smooth(e) => write!(f, "smoothing: {e}"),
        }
    }
}

impl Error for PassError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Smooth(e) => Some(e),
        }
    }
}

impl From<ConfigError> for PassError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SmoothError> for PassError {
    fn from(e: SmoothError) -> Self {
        Self::Smooth(e)
    }
}

// ── PassOutput ─────────────────────────────────────────────────────

/// Result of [`GlyphPass::run()`].
#[derive(Debug)]
pub struct PassOutput {
    /// Aggregated (and possibly smoothed) cells.
    pub grid: Grid,
    /// Aggregation diagnostics.
    pub summary: AggregationSummary,
    /// Smoothing outcome, when smoothing was enabled.
    pub smoothing: Option<SmoothReport>,
}

// ── GlyphPass ──────────────────────────────────────────────────────

/// Layer state that survives between redraws.
///
/// # Example
///
/// ```
/// use glyphgrid::prelude::*;
///
/// let mut pass = GlyphPass::new(
///     Tessellation::Grid,
///     AggregationConfig::builder().cell_size(20.0).build().unwrap(),
/// );
/// let count = from_fn(|cell: &mut Cell, _: &Point, w: f64, _: &mut Context| {
///     cell.accumulate("count", w);
/// });
/// let data = [Point::new(10.0, 10.0), Point::new(15.0, 15.0), Point::new(60.0, 65.0)];
///
/// let out = pass
///     .run(&data, |p| Location::Point(*p), &IdentityProjection, &[&count], &mut Context::new())
///     .unwrap();
/// assert_eq!(out.grid.cell(0, 0).unwrap().scalar("count"), Some(2.0));
/// assert!(out.smoothing.is_none());
/// ```
pub struct GlyphPass {
    cache: DiscretizerCache,
    tessellation: Tessellation,
    aggregation: AggregationConfig,
    smoothing: Option<SmoothingConfig>,
}

impl GlyphPass {
    /// A pass with no smoothing.
    pub fn new(tessellation: Tessellation, aggregation: AggregationConfig) -> Self {
        Self {
            cache: DiscretizerCache::new(),
            tessellation,
            aggregation,
            smoothing: None,
        }
    }

    /// Enable smoothing with `config`.
    pub fn with_smoothing(mut self, config: SmoothingConfig) -> Self {
        self.smoothing = Some(config);
        self
    }

    /// Current tessellation.
    pub fn tessellation(&self) -> Tessellation {
        self.tessellation
    }

    /// Current aggregation settings.
    pub fn aggregation(&self) -> &AggregationConfig {
        &self.aggregation
    }

    /// Current smoothing settings.
    pub fn smoothing(&self) -> Option<&SmoothingConfig> {
        self.smoothing.as_ref()
    }

    /// Switch tessellation for the next pass.
    pub fn set_tessellation(&mut self, tessellation: Tessellation) {
        self.tessellation = tessellation;
    }

    /// Replace the aggregation settings for the next pass.
    pub fn set_aggregation(&mut self, config: AggregationConfig) {
        self.aggregation = config;
    }

    /// Replace or clear the smoothing settings for the next pass.
    pub fn set_smoothing(&mut self, config: Option<SmoothingConfig>) {
        self.smoothing = config;
    }

    /// The discretizer used by the most recent pass.
    pub fn discretizer(&self) -> Option<&Arc<dyn Discretizer>> {
        self.cache.current()
    }

    /// Aggregate `data` and smooth the result when enabled.
    ///
    /// Every configuration check runs before the first datum is
    /// examined.
    ///
    /// # Errors
    ///
    /// - `Config` for an invalid discretizer, an assignment mode the
    ///   tessellation does not support, or box blur on a hex grid.
    /// - `Smooth` when a smoothed property's values do not match their
    ///   declared kind.
    pub fn run<R, L>(
        &mut self,
        data: &[R],
        locate: L,
        projection: &dyn Projection,
        aggregators: &[&dyn Aggregator<R>],
        ctx: &mut Context,
    ) -> Result<PassOutput, PassError>
    where
        L: Fn(&R) -> Location,
    {
        let smoothing = self.smoothing.as_ref().filter(|s| s.is_enabled());
        if let Some(s) = smoothing {
            if matches!(s.method(), SmoothingMethod::BoxBlur { .. })
                && self.tessellation == Tessellation::Hex
            {
                return Err(ConfigError::UnsupportedTessellation {
                    operation: "box blur",
                    tessellation: Tessellation::Hex,
                }
                .into());
            }
        }

        let discretizer = self
            .cache
            .get(self.tessellation, self.aggregation.cell_size())?;
        let aggregation = Aggregation::new(discretizer, &self.aggregation, projection)?;
        let output = aggregation.run(data, locate, aggregators, ctx);
        let mut grid = output.grid;

        let report = match smoothing {
            Some(s) => Some(s.apply(&mut grid)?),
            None => None,
        };
        log::debug!(
            "glyph pass: {} cells ({} synthetic)",
            grid.len(),
            report.map_or(0, |r| r.created)
        );
        Ok(PassOutput {
            grid,
            summary: output.summary,
            smoothing: report,
        })
    }
}

impl fmt::Debug for GlyphPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphPass")
            .field("tessellation", &self.tessellation)
            .field("aggregation", &self.aggregation)
            .field("smoothing", &self.smoothing)
            .finish()
    }
}
