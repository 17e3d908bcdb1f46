//! Aggregation pass configuration.

use glyphgrid_core::{ConfigError, Point};

/// Default cell size in pixels.
pub const DEFAULT_CELL_SIZE: f64 = 20.0;

/// How a point datum is assigned to cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AssignmentMode {
    /// One assignment to the containing cell, weight 1.
    #[default]
    Single,
    /// Full-weight assignments for a sub-grid of shifted copies of the
    /// point spanning one cell, plus the point itself.
    OffsetOversample,
    /// Four fractional assignments (own cell, nearest diagonal, nearest
    /// horizontal and nearest vertical neighbour) summing to 1.
    /// Square tessellation only.
    ReduceMaup,
}

/// Where the tessellation origin is pinned.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Origin {
    /// Cell `(0, 0)` starts at screen origin.
    #[default]
    World,
    /// Cell boundaries pass through the screen position of this world
    /// coordinate (e.g. the mouse position).
    RelativeTo(Point),
}

/// Screen size of the view being aggregated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// A viewport of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Validated settings for one aggregation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregationConfig {
    cell_size: f64,
    mode: AssignmentMode,
    origin: Origin,
    viewport: Option<Viewport>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            mode: AssignmentMode::default(),
            origin: Origin::default(),
            viewport: None,
        }
    }
}

impl AggregationConfig {
    /// Create a builder starting from the defaults.
    pub fn builder() -> AggregationConfigBuilder {
        AggregationConfigBuilder {
            config: Self::default(),
        }
    }

    /// Cell size in pixels.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Point assignment mode.
    pub fn mode(&self) -> AssignmentMode {
        self.mode
    }

    /// Tessellation origin.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Viewport, when the world extent should be reported.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }
}

/// Builder for [`AggregationConfig`].
#[derive(Clone, Debug)]
pub struct AggregationConfigBuilder {
    config: AggregationConfig,
}

impl AggregationConfigBuilder {
    /// Set the cell size in pixels.
    pub fn cell_size(mut self, cell_size: f64) -> Self {
        self.config.cell_size = cell_size;
        self
    }

    /// Set the point assignment mode.
    pub fn mode(mut self, mode: AssignmentMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the tessellation origin.
    pub fn origin(mut self, origin: Origin) -> Self {
        self.config.origin = origin;
        self
    }

    /// Report the world extent of a viewport of this size.
    pub fn viewport(mut self, width: f64, height: f64) -> Self {
        self.config.viewport = Some(Viewport::new(width, height));
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// - `InvalidCellSize` unless the cell size is finite and positive.
    /// - `InvalidOrigin` when a relative origin is not finite.
    /// - `InvalidViewport` unless both viewport dimensions are finite
    ///   and positive.
    pub fn build(self) -> Result<AggregationConfig, ConfigError> {
        let c = self.config;
        if !(c.cell_size > 0.0) || !c.cell_size.is_finite() {
            return Err(ConfigError::InvalidCellSize { value: c.cell_size });
        }
        if let Origin::RelativeTo(p) = c.origin {
            if !p.is_finite() {
                return Err(ConfigError::InvalidOrigin);
            }
        }
        if let Some(Viewport { width, height }) = c.viewport {
            let ok = |v: f64| v > 0.0 && v.is_finite();
            if !ok(width) || !ok(height) {
                return Err(ConfigError::InvalidViewport { width, height });
            }
        }
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build() {
        let c = AggregationConfig::builder().build().unwrap();
        assert_eq!(c, AggregationConfig::default());
        assert_eq!(c.cell_size(), DEFAULT_CELL_SIZE);
        assert_eq!(c.mode(), AssignmentMode::Single);
        assert_eq!(c.origin(), Origin::World);
        assert!(c.viewport().is_none());
    }

    #[test]
    fn builder_sets_every_field() {
        let c = AggregationConfig::builder()
            .cell_size(12.0)
            .mode(AssignmentMode::ReduceMaup)
            .origin(Origin::RelativeTo(Point::new(3.0, 4.0)))
            .viewport(800.0, 600.0)
            .build()
            .unwrap();
        assert_eq!(c.cell_size(), 12.0);
        assert_eq!(c.mode(), AssignmentMode::ReduceMaup);
        assert_eq!(c.origin(), Origin::RelativeTo(Point::new(3.0, 4.0)));
        assert_eq!(c.viewport(), Some(Viewport::new(800.0, 600.0)));
    }

    #[test]
    fn rejects_bad_cell_size() {
        for bad in [0.0, -5.0, f64::NAN] {
            assert!(matches!(
                AggregationConfig::builder().cell_size(bad).build(),
                Err(ConfigError::InvalidCellSize { .. })
            ));
        }
    }

    #[test]
    fn rejects_non_finite_origin() {
        let r = AggregationConfig::builder()
            .origin(Origin::RelativeTo(Point::new(f64::INFINITY, 0.0)))
            .build();
        assert_eq!(r, Err(ConfigError::InvalidOrigin));
    }

    #[test]
    fn rejects_empty_viewport() {
        let r = AggregationConfig::builder().viewport(0.0, 100.0).build();
        assert!(matches!(r, Err(ConfigError::InvalidViewport { .. })));
    }
}
