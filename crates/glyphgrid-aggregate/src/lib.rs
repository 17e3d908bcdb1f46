//! Cell grid, aggregation strategies and the aggregation driver.
//!
//! An [`Aggregation`] binds a [`Discretizer`](glyphgrid_space::Discretizer),
//! an [`AggregationConfig`] and a [`Projection`]; each call to
//! [`Aggregation::run`] builds a fresh [`Grid`] by assigning every datum
//! to one or more cells and handing each assignment to a list of
//! [`Aggregator`]s.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod aggregator;
pub mod assign;
pub mod cell;
pub mod config;
pub mod context;
pub mod driver;
pub mod grid;
pub mod heatmap;
pub mod location;
pub mod projection;
pub mod summary;

pub use aggregator::{from_fn, Aggregator, FnAggregator};
pub use cell::{Cell, CellGeometry};
pub use config::{AggregationConfig, AggregationConfigBuilder, AssignmentMode, Origin, Viewport};
pub use context::{Context, Scope};
pub use driver::Aggregation;
pub use grid::Grid;
pub use heatmap::{HeatmapAggregator, HeatmapKind};
pub use location::{Geometry, Location};
pub use projection::{FnProjection, IdentityProjection, Projection};
pub use summary::{AggregationOutput, AggregationSummary, WorldExtent};
