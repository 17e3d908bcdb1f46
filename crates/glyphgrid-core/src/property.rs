//! Per-cell aggregated properties.
//!
//! The aggregation driver never interprets these; aggregators write them
//! and smoothers read them back by name and [`PropertyKind`].

use crate::error::ConfigError;
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

/// Named properties attached to a cell, in first-write order.
pub type PropertyMap = IndexMap<String, PropertyValue>;

/// Type tag for a smoothable property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// A single real number (selector `"value"`).
    Value,
    /// A numeric vector of consistent length across cells (selector `"array"`).
    Array,
}

impl PropertyKind {
    /// The selector string accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "value" => Ok(Self::Value),
            "array" => Ok(Self::Array),
            other => Err(ConfigError::UnknownPropertyKind {
                name: other.to_string(),
            }),
        }
    }
}

/// A property value stored on a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Scalar value.
    Scalar(f64),
    /// Numeric vector.
    Array(Vec<f64>),
}

impl PropertyValue {
    /// The kind tag matching this value's shape.
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Scalar(_) => PropertyKind::Value,
            Self::Array(_) => PropertyKind::Array,
        }
    }

    /// The scalar, or `None` for arrays.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Array(_) => None,
        }
    }

    /// The vector, or `None` for scalars.
    pub fn as_array(&self) -> Option<&[f64]> {
        match self {
            Self::Scalar(_) => None,
            Self::Array(v) => Some(v),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec<f64>> for PropertyValue {
    fn from(v: Vec<f64>) -> Self {
        Self::Array(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_selectors() {
        assert_eq!("value".parse::<PropertyKind>().unwrap(), PropertyKind::Value);
        assert_eq!("array".parse::<PropertyKind>().unwrap(), PropertyKind::Array);
        assert!("matrix".parse::<PropertyKind>().is_err());
    }

    #[test]
    fn value_accessors_match_shape() {
        let s = PropertyValue::from(2.5);
        assert_eq!(s.kind(), PropertyKind::Value);
        assert_eq!(s.as_scalar(), Some(2.5));
        assert!(s.as_array().is_none());

        let a = PropertyValue::from(vec![1.0, 2.0]);
        assert_eq!(a.kind(), PropertyKind::Array);
        assert_eq!(a.as_array(), Some(&[1.0, 2.0][..]));
        assert!(a.as_scalar().is_none());
    }

    #[test]
    fn map_preserves_insertion_order() {
        let mut m = PropertyMap::new();
        m.insert("value".into(), 1.0.into());
        m.insert("count".into(), 2.0.into());
        let keys: Vec<_> = m.keys().cloned().collect();
        assert_eq!(keys, vec!["value", "count"]);
    }
}
