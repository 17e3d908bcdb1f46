//! Core types for the glyphgrid discretisation engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other layer: screen-space [`Point`]s,
//! integer [`CellIndex`]es, the [`Tessellation`] tag, per-cell
//! [`PropertyValue`]s, and the error enums.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod property;
pub mod types;

pub use error::{ConfigError, DatumError};
pub use property::{PropertyKind, PropertyMap, PropertyValue};
pub use types::{CellIndex, Point, Tessellation};
