//! Shared state threaded through every aggregation stage.
//!
//! [`Context`] carries two [`Scope`]s: `global`, shared by every panel of
//! a view (colour-scale maxima and similar cross-cutting values), and
//! `panel`, private to the panel being aggregated. Both are owned by the
//! caller and outlive a single pass; the driver only lends them to each
//! aggregator in turn.

use glyphgrid_core::PropertyValue;
use indexmap::IndexMap;

/// A named bag of values shared between aggregation stages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scope {
    values: IndexMap<String, PropertyValue>,
}

impl Scope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    /// Look up a scalar value.
    pub fn scalar(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(PropertyValue::as_scalar)
    }

    /// Store a value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Remove a value, returning it if present.
    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.values.shift_remove(key)
    }

    /// Raise the scalar under `key` to at least `candidate`.
    ///
    /// A missing or non-scalar entry is replaced. Returns the stored maximum.
    pub fn raise_max(&mut self, key: &str, candidate: f64) -> f64 {
        let current = self.scalar(key).unwrap_or(f64::NEG_INFINITY);
        let max = current.max(candidate);
        self.values.insert(key.to_string(), PropertyValue::Scalar(max));
        max
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the scope holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The `global` and `panel` scopes lent to each aggregator call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Context {
    /// State shared across all panels of a view.
    pub global: Scope,
    /// State private to one panel.
    pub panel: Scope,
}

impl Context {
    /// Create a context with empty scopes.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_set_get_and_remove() {
        let mut s = Scope::new();
        assert!(s.is_empty());
        s.set("colour_max", 12.0);
        s.set("bins", vec![1.0, 2.0]);
        assert_eq!(s.scalar("colour_max"), Some(12.0));
        assert_eq!(s.scalar("bins"), None);
        assert_eq!(s.len(), 2);
        assert_eq!(s.remove("colour_max"), Some(PropertyValue::Scalar(12.0)));
        assert!(s.get("colour_max").is_none());
    }

    #[test]
    fn raise_max_tracks_running_maximum() {
        let mut s = Scope::new();
        assert_eq!(s.raise_max("m", 3.0), 3.0);
        assert_eq!(s.raise_max("m", 1.0), 3.0);
        assert_eq!(s.raise_max("m", 7.5), 7.5);
        assert_eq!(s.scalar("m"), Some(7.5));
    }

    #[test]
    fn global_and_panel_are_independent() {
        let mut ctx = Context::new();
        ctx.global.set("k", 1.0);
        assert!(ctx.panel.get("k").is_none());
    }
}
