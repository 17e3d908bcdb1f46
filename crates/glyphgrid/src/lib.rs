//! Glyphgrid: spatial discretisation, aggregation and smoothing for map
//! glyph layers.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all glyphgrid sub-crates, plus [`GlyphPass`], which runs one complete
//! redraw cycle. For most users, adding `glyphgrid` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use glyphgrid::prelude::*;
//!
//! struct Sample {
//!     lon: f64,
//!     lat: f64,
//!     reading: f64,
//! }
//!
//! let data = vec![
//!     Sample { lon: 10.0, lat: 10.0, reading: 100.0 },
//!     Sample { lon: 15.0, lat: 15.0, reading: 100.0 },
//!     Sample { lon: 60.0, lat: 65.0, reading: 20.0 },
//! ];
//!
//! // Mean reading per hexagon, kernel-smoothed over two cells.
//! let heatmap = HeatmapAggregator::new(HeatmapKind::Mean, |s: &Sample| s.reading);
//! let mut pass = GlyphPass::new(
//!     Tessellation::Hex,
//!     AggregationConfig::builder().cell_size(20.0).build().unwrap(),
//! )
//! .with_smoothing(
//!     SmoothingConfig::builder()
//!         .bandwidth(2)
//!         .property(SmoothProperty::value("value"))
//!         .build()
//!         .unwrap(),
//! );
//!
//! let out = pass
//!     .run(
//!         &data,
//!         |s: &Sample| Location::Point(Point::new(s.lon, s.lat)),
//!         &IdentityProjection,
//!         &[&heatmap],
//!         &mut Context::new(),
//!     )
//!     .unwrap();
//!
//! assert!(out.summary.is_clean());
//! assert!(out.grid.iter().any(|c| c.is_synthetic()));
//! for (cell, geometry) in out.grid.cells_with_geometry() {
//!     let _outline = geometry.boundary(0.0);
//!     let _value = cell.scalar("value");
//! }
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `glyphgrid-core` | Points, cell indices, property values, errors |
//! | [`space`] | `glyphgrid-space` | Square and hex discretizers, factory and cache |
//! | [`aggregate`] | `glyphgrid-aggregate` | Grid, cells, aggregators and the driver |
//! | [`smooth`] | `glyphgrid-smooth` | Kernel smoothing and box blur |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod pass;

pub use pass::{GlyphPass, PassError, PassOutput};

/// Core types and errors (`glyphgrid-core`).
///
/// Contains [`types::Point`], [`types::CellIndex`], the
/// [`types::PropertyValue`] cell payload, and the [`types::ConfigError`]
/// and [`types::DatumError`] enums.
pub use glyphgrid_core as types;

/// Discretizers (`glyphgrid-space`).
///
/// Provides the [`space::Discretizer`] trait, the
/// [`space::SquareDiscretizer`] and [`space::HexDiscretizer`] backends,
/// and [`space::DiscretizerCache`].
pub use glyphgrid_space as space;

/// Grid, aggregation strategies and the driver (`glyphgrid-aggregate`).
///
/// The [`aggregate::Aggregator`] trait is the main extension point for
/// user-defined per-cell statistics.
pub use glyphgrid_aggregate as aggregate;

/// Post-aggregation smoothing (`glyphgrid-smooth`).
///
/// [`smooth::KernelSmoother`] for distance-weighted smoothing on either
/// tessellation, [`smooth::BoxBlur`] for a cheaper square-only pass.
pub use glyphgrid_smooth as smooth;

/// Common imports for typical glyphgrid usage.
///
/// ```rust
/// use glyphgrid::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use glyphgrid_core::{
        CellIndex, ConfigError, DatumError, Point, PropertyKind, PropertyValue, Tessellation,
    };

    // Space
    pub use glyphgrid_space::{discretizer_for, Discretizer, HexDiscretizer, SquareDiscretizer};

    // Aggregation
    pub use glyphgrid_aggregate::{
        from_fn, AggregationConfig, AssignmentMode, Aggregator, Cell, Context, Geometry, Grid,
        HeatmapAggregator, HeatmapKind, IdentityProjection, Location, Origin, Projection,
    };

    // Smoothing
    pub use glyphgrid_smooth::{SmoothProperty, SmoothingConfig, SmoothingMethod};

    // Pass
    pub use crate::pass::{GlyphPass, PassError, PassOutput};
}
