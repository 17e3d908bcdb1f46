//! Smoothing pass configuration and dispatch.

use crate::blur::{BoxBlur, DEFAULT_BLUR_ITERATIONS};
use crate::error::SmoothError;
use crate::kernel::KernelSmoother;
use crate::property::{SmoothProperty, SmoothReport};
use glyphgrid_aggregate::Grid;
use glyphgrid_core::ConfigError;

/// Which smoothing algorithm a pass runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SmoothingMethod {
    /// Distance-weighted kernel over grid or hex neighbourhoods.
    #[default]
    Kernel,
    /// Iterated box blur, square tessellation only.
    BoxBlur {
        /// Passes per axis.
        iterations: u32,
    },
}

impl SmoothingMethod {
    /// Box blur with the default iteration count.
    pub fn box_blur() -> Self {
        Self::BoxBlur {
            iterations: DEFAULT_BLUR_ITERATIONS,
        }
    }
}

/// Validated settings for one smoothing pass.
///
/// A bandwidth of 0 disables smoothing. The kernel radius equals the
/// bandwidth; the box-blur radius is half of it, truncated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SmoothingConfig {
    method: SmoothingMethod,
    bandwidth: u32,
    properties: Vec<SmoothProperty>,
}

impl SmoothingConfig {
    /// Create a builder starting from the defaults (kernel, bandwidth 0).
    pub fn builder() -> SmoothingConfigBuilder {
        SmoothingConfigBuilder {
            config: Self::default(),
        }
    }

    /// Smoothing algorithm.
    pub fn method(&self) -> SmoothingMethod {
        self.method
    }

    /// Bandwidth in cells.
    pub fn bandwidth(&self) -> u32 {
        self.bandwidth
    }

    /// Properties to smooth.
    pub fn properties(&self) -> &[SmoothProperty] {
        &self.properties
    }

    /// Whether a pass with this config changes anything.
    pub fn is_enabled(&self) -> bool {
        self.bandwidth > 0
    }

    /// Smooth `grid` in place with the configured method.
    ///
    /// Returns an empty report when the bandwidth is 0.
    pub fn apply(&self, grid: &mut Grid) -> Result<SmoothReport, SmoothError> {
        if !self.is_enabled() {
            return Ok(SmoothReport::default());
        }
        match self.method {
            SmoothingMethod::Kernel => {
                KernelSmoother::new(self.bandwidth)?.smooth(grid, &self.properties)
            }
            SmoothingMethod::BoxBlur { iterations } => {
                BoxBlur::new(self.bandwidth / 2, iterations).smooth(grid, &self.properties)
            }
        }
    }
}

/// Builder for [`SmoothingConfig`].
#[derive(Clone, Debug)]
pub struct SmoothingConfigBuilder {
    config: SmoothingConfig,
}

impl SmoothingConfigBuilder {
    /// Set the algorithm.
    pub fn method(mut self, method: SmoothingMethod) -> Self {
        self.config.method = method;
        self
    }

    /// Set the bandwidth in cells.
    pub fn bandwidth(mut self, bandwidth: u32) -> Self {
        self.config.bandwidth = bandwidth;
        self
    }

    /// Add one property to smooth.
    pub fn property(mut self, property: SmoothProperty) -> Self {
        self.config.properties.push(property);
        self
    }

    /// Add several properties to smooth.
    pub fn properties(mut self, properties: impl IntoIterator<Item = SmoothProperty>) -> Self {
        self.config.properties.extend(properties);
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// `MissingSmoothProperties` when smoothing is enabled with no
    /// properties listed.
    pub fn build(self) -> Result<SmoothingConfig, ConfigError> {
        let c = self.config;
        if c.bandwidth > 0 && c.properties.is_empty() {
            return Err(ConfigError::MissingSmoothProperties);
        }
        Ok(c)
    }
}
