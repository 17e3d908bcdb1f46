//! Discretizers for the glyphgrid engine.
//!
//! This crate defines the [`Discretizer`] trait, the pure mapping between
//! continuous screen coordinates and integer cell indices, along with the
//! two concrete tessellations and a small factory layer.
//!
//! # Backends
//!
//! - [`SquareDiscretizer`]: axis-aligned square cells
//! - [`HexDiscretizer`]: flat-top hexagons, odd columns shifted down by
//!   half a hex height
//!
//! # Selection
//!
//! [`discretizer_for`] builds a backend from a [`Tessellation`] tag, and
//! [`DiscretizerCache`] keeps one alive across passes until the shape or
//! cell size changes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod discretizer;
pub mod factory;
pub mod hex;
pub mod square;

#[cfg(test)]
pub(crate) mod compliance;

pub use discretizer::{Boundary, Discretizer};
pub use factory::{discretizer_for, DiscretizerCache};
pub use glyphgrid_core::Tessellation;
pub use hex::HexDiscretizer;
pub use square::SquareDiscretizer;
