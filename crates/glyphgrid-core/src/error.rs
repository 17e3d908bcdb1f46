//! Error types for the glyphgrid engine.
//!
//! Two classes, matching how they propagate:
//!
//! - [`ConfigError`]: the call is misconfigured and fails before any
//!   aggregation or smoothing work starts.
//! - [`DatumError`]: a single record could not be placed. The driver
//!   records it, skips the record, and carries on with the rest.

use crate::types::Tessellation;
use std::error::Error;
use std::fmt;

/// Misconfiguration detected before a pass starts.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The tessellation selector is neither `"grid"` nor `"hex"`.
    UnknownTessellation {
        /// The unrecognised selector.
        name: String,
    },
    /// A property kind selector is neither `"value"` nor `"array"`.
    UnknownPropertyKind {
        /// The unrecognised selector.
        name: String,
    },
    /// Cell size is zero, negative, NaN, or infinite.
    InvalidCellSize {
        /// The rejected size.
        value: f64,
    },
    /// The cell size is too small to produce a hexagon of radius >= 1px.
    HexTooSmall {
        /// The rejected size.
        cell_size: f64,
    },
    /// The configured cell size differs from the discretizer's.
    CellSizeMismatch {
        /// Cell size in the aggregation config.
        configured: f64,
        /// Cell size the discretizer was built with.
        discretizer: f64,
    },
    /// Kernel radius must be at least one cell.
    InvalidKernelRadius {
        /// The rejected radius.
        value: u32,
    },
    /// Smoothing was requested without any property to smooth.
    MissingSmoothProperties,
    /// The operation is only defined for another tessellation.
    UnsupportedTessellation {
        /// What was requested.
        operation: &'static str,
        /// The tessellation it was requested on.
        tessellation: Tessellation,
    },
    /// The reference point of a relative origin is not finite.
    InvalidOrigin,
    /// A viewport dimension is not finite and positive.
    InvalidViewport {
        /// Width as configured.
        width: f64,
        /// Height as configured.
        height: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTessellation { name } => {
                write!(f, "unknown tessellation '{name}', expected 'grid' or 'hex'")
            }
            Self::UnknownPropertyKind { name } => {
                write!(f, "unknown property kind '{name}', expected 'value' or 'array'")
            }
            Self::InvalidCellSize { value } => {
                write!(f, "cell size must be finite and positive, got {value}")
            }
            Self::HexTooSmall { cell_size } => {
                write!(f, "cell size {cell_size} is too small for a hexagon")
            }
            Self::CellSizeMismatch {
                configured,
                discretizer,
            } => write!(
                f,
                "configured cell size {configured} does not match discretizer cell size {discretizer}"
            ),
            Self::InvalidKernelRadius { value } => {
                write!(f, "kernel radius must be >= 1, got {value}")
            }
            Self::MissingSmoothProperties => {
                write!(f, "smoothing requires at least one property")
            }
            Self::UnsupportedTessellation {
                operation,
                tessellation,
            } => write!(f, "{operation} is not supported on {tessellation} tessellation"),
            Self::InvalidOrigin => write!(f, "origin reference point must be finite"),
            Self::InvalidViewport { width, height } => {
                write!(f, "viewport must be finite and positive, got {width}x{height}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Why a single record was skipped during aggregation.
#[derive(Clone, Debug, PartialEq)]
pub enum DatumError {
    /// The location function produced a NaN or infinite coordinate.
    NonFiniteCoordinate,
    /// A feature geometry has no vertices, so no bounding box exists.
    EmptyGeometry,
    /// The projection mapped a finite coordinate to a non-finite one.
    NonFiniteProjection,
    /// The coordinate lies too far from the tessellation origin to have
    /// an exact cell index.
    IndexOutOfRange,
}

impl fmt::Display for DatumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteCoordinate => write!(f, "location is not a finite coordinate"),
            Self::EmptyGeometry => write!(f, "feature geometry has no bounding box"),
            Self::NonFiniteProjection => write!(f, "projection produced a non-finite coordinate"),
            Self::IndexOutOfRange => write!(f, "location is outside the addressable cell range"),
        }
    }
}

impl Error for DatumError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_messages_name_the_value() {
        let e = ConfigError::InvalidCellSize { value: -2.0 };
        assert!(e.to_string().contains("-2"));

        let e = ConfigError::UnsupportedTessellation {
            operation: "box blur",
            tessellation: Tessellation::Hex,
        };
        assert_eq!(e.to_string(), "box blur is not supported on hex tessellation");
    }

    #[test]
    fn datum_error_is_std_error() {
        let e: Box<dyn Error> = Box::new(DatumError::EmptyGeometry);
        assert_eq!(e.to_string(), "feature geometry has no bounding box");
    }
}
