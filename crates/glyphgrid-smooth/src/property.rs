//! Which cell properties a smoother touches, and what it did to them.

use crate::error::SmoothError;
use glyphgrid_aggregate::Grid;
use glyphgrid_core::{ConfigError, PropertyKind, PropertyValue};

/// A property to smooth, with its declared shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SmoothProperty {
    /// Cell property name.
    pub name: String,
    /// Declared shape.
    pub kind: PropertyKind,
}

impl SmoothProperty {
    /// A scalar property.
    pub fn value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Value,
        }
    }

    /// A numeric-vector property.
    pub fn array(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Array,
        }
    }

    /// Build from a name and a kind selector (`"value"` or `"array"`).
    pub fn parse(name: impl Into<String>, kind: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            name: name.into(),
            kind: kind.parse()?,
        })
    }

    /// Convert an aggregator's advertised list.
    pub fn from_advertised(advertised: &[(&str, PropertyKind)]) -> Vec<Self> {
        advertised
            .iter()
            .map(|&(name, kind)| Self {
                name: name.to_string(),
                kind,
            })
            .collect()
    }
}

/// Outcome of one smoothing pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SmoothReport {
    /// Synthetic cells created by the pass.
    pub created: usize,
    /// Property values written, across all properties.
    pub written: usize,
    /// Properties skipped because the method cannot handle their kind.
    pub skipped_properties: usize,
}

/// Fail unless every cell's value for each property matches its kind.
pub(crate) fn check_kinds(grid: &Grid, properties: &[SmoothProperty]) -> Result<(), SmoothError> {
    for p in properties {
        let bad = grid.iter().find(|c| {
            c.get(&p.name)
                .is_some_and(|v: &PropertyValue| v.kind() != p.kind)
        });
        if let Some(c) = bad {
            return Err(SmoothError::KindMismatch {
                property: p.name.clone(),
                index: c.index(),
                expected: p.kind,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphgrid_core::CellIndex;
    use glyphgrid_test_utils::{sparse_grid, square};

    #[test]
    fn parse_accepts_known_kinds() {
        assert_eq!(
            SmoothProperty::parse("value", "value").unwrap(),
            SmoothProperty::value("value")
        );
        assert_eq!(
            SmoothProperty::parse("bins", "array").unwrap(),
            SmoothProperty::array("bins")
        );
        assert!(matches!(
            SmoothProperty::parse("x", "scalar"),
            Err(ConfigError::UnknownPropertyKind { .. })
        ));
    }

    #[test]
    fn from_advertised_keeps_order() {
        let props = SmoothProperty::from_advertised(&[
            ("value", PropertyKind::Value),
            ("bins", PropertyKind::Array),
        ]);
        assert_eq!(props, vec![SmoothProperty::value("value"), SmoothProperty::array("bins")]);
    }

    #[test]
    fn check_kinds_reports_first_mismatch() {
        let mut g = sparse_grid(square(10.0), "v", &[((0, 0), 1.0), ((2, 0), 1.0)]);
        g.get_or_insert(CellIndex::new(1, 0)).set("v", vec![1.0]);
        let e = check_kinds(&g, &[SmoothProperty::value("v")]).unwrap_err();
        assert!(matches!(e, SmoothError::KindMismatch { index, .. } if index == CellIndex::new(1, 0)));
        assert!(check_kinds(&g, &[SmoothProperty::value("other")]).is_ok());
    }
}
