//! Smoothing errors.

use glyphgrid_core::{CellIndex, ConfigError, PropertyKind};
use std::error::Error;
use std::fmt;

/// Why a smoothing pass did not run.
///
/// Every check happens before the first write, so a failed pass leaves
/// the grid untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum SmoothError {
    /// The smoothing configuration is invalid for this grid.
    Config(ConfigError),
    /// A cell holds a property with a different shape than declared.
    KindMismatch {
        /// Property name.
        property: String,
        /// The first offending cell.
        index: CellIndex,
        /// Declared kind.
        expected: PropertyKind,
    },
}

impl fmt::Display for SmoothError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::KindMismatch {
                property,
                index,
                expected,
            } => write!(
                f,
                "property '{property}' at cell {index} is not of declared kind {expected}"
            ),
        }
    }
}

impl Error for SmoothError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::KindMismatch { .. } => None,
        }
    }
}

impl From<ConfigError> for SmoothError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_is_the_source() {
        let e = SmoothError::from(ConfigError::MissingSmoothProperties);
        assert!(e.source().is_some());
        assert_eq!(e.to_string(), "config: smoothing requires at least one property");
    }

    #[test]
    fn kind_mismatch_names_cell() {
        let e = SmoothError::KindMismatch {
            property: "value".into(),
            index: CellIndex::new(2, -1),
            expected: PropertyKind::Value,
        };
        assert!(e.to_string().contains("(2, -1)"));
        assert!(e.source().is_none());
    }
}
