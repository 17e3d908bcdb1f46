//! Building discretizers from a tessellation tag, and reusing them across
//! passes.

use crate::discretizer::Discretizer;
use crate::hex::HexDiscretizer;
use crate::square::SquareDiscretizer;
use glyphgrid_core::{ConfigError, Tessellation};
use std::sync::Arc;

/// Build the discretizer for `tessellation` at `cell_size`.
///
/// # Errors
///
/// Propagates the backend constructor's [`ConfigError`].
pub fn discretizer_for(
    tessellation: Tessellation,
    cell_size: f64,
) -> Result<Arc<dyn Discretizer>, ConfigError> {
    Ok(match tessellation {
        Tessellation::Grid => Arc::new(SquareDiscretizer::new(cell_size)?),
        Tessellation::Hex => Arc::new(HexDiscretizer::new(cell_size)?),
    })
}

/// Holds the discretizer of the previous pass.
///
/// A redraw at the same tessellation and cell size reuses the existing
/// instance (and the hex padding memo inside it); a change to either
/// rebuilds it.
#[derive(Default)]
pub struct DiscretizerCache {
    current: Option<Arc<dyn Discretizer>>,
}

impl DiscretizerCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a discretizer for `tessellation` at `cell_size`, building a
    /// new one only if the cached instance does not match.
    pub fn get(
        &mut self,
        tessellation: Tessellation,
        cell_size: f64,
    ) -> Result<Arc<dyn Discretizer>, ConfigError> {
        if let Some(d) = &self.current {
            if d.tessellation() == tessellation && d.cell_size() == cell_size {
                return Ok(Arc::clone(d));
            }
        }
        log::debug!("building {tessellation} discretizer for cell size {cell_size}");
        let d = discretizer_for(tessellation, cell_size)?;
        self.current = Some(Arc::clone(&d));
        Ok(d)
    }

    /// The cached discretizer, if any.
    pub fn current(&self) -> Option<&Arc<dyn Discretizer>> {
        self.current.as_ref()
    }

    /// Drop the cached discretizer.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

impl std::fmt::Debug for DiscretizerCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let current = self
            .current
            .as_ref()
            .map(|d| (d.tessellation(), d.cell_size()));
        f.debug_struct("DiscretizerCache")
            .field("current", &current)
            .finish()
    }
}
