//! Post-aggregation smoothing of cell properties.
//!
//! Two methods operate on a populated [`Grid`](glyphgrid_aggregate::Grid):
//!
//! - [`KernelSmoother`]: distance-weighted moving average over square or
//!   hex neighbourhoods, for scalar and array properties.
//! - [`BoxBlur`]: iterated separable box blur, square grids and scalar
//!   properties only.
//!
//! Both may create synthetic cells where a previously empty index gains
//! a non-zero value. [`SmoothingConfig`] selects a method from a
//! bandwidth and dispatches to it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod blur;
pub mod config;
pub mod error;
pub mod kernel;
pub mod property;

pub use blur::{BoxBlur, DEFAULT_BLUR_ITERATIONS};
pub use config::{SmoothingConfig, SmoothingConfigBuilder, SmoothingMethod};
pub use error::SmoothError;
pub use kernel::{kernel_weight, KernelSmoother, KernelWeights};
pub use property::{SmoothProperty, SmoothReport};
