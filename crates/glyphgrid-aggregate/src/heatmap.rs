//! Ready-made heatmap aggregator.
//!
//! Accumulates one number per record into the cell property `value`,
//! then finishes the statistic in `post_aggregate`. Optional extras:
//! per-record weights (weighted mean), a normalising denominator, and an
//! autoscaled colour maximum published to the global scope.

use crate::aggregator::Aggregator;
use crate::cell::Cell;
use crate::context::Context;
use glyphgrid_core::PropertyKind;

/// Cell property holding the heatmap statistic.
pub const VALUE: &str = "value";
/// Cell property holding the summed assignment weight.
pub const COUNT: &str = "count";
/// Cell property holding the summed record weight (weighted mean).
pub const TOTAL_WEIGHT: &str = "total_weight";
/// Cell property holding the summed normalising denominator.
pub const DENOMINATOR: &str = "denominator";
/// Global scope key for the autoscaled colour maximum.
pub const COLOUR_MAX: &str = "colour_max";

/// Quantile of cell values used as the autoscaled colour maximum.
pub const COLOUR_MAX_QUANTILE: f64 = 0.99;

const SMOOTHABLE: &[(&str, PropertyKind)] = &[(VALUE, PropertyKind::Value)];

/// Which statistic the heatmap shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeatmapKind {
    /// Weighted sum of values divided by summed assignment weight.
    #[default]
    Mean,
    /// Weighted sum of values.
    Sum,
    /// Sum of `value * record weight * assignment weight` divided by the
    /// summed `record weight * assignment weight`.
    WeightedMean,
    /// Summed assignment weight.
    Count,
}

type Extract<R> = Box<dyn Fn(&R) -> f64 + Send + Sync>;

/// Heatmap aggregation strategy for records of type `R`.
///
/// ```
/// use glyphgrid_aggregate::{Aggregator, Cell, Context, HeatmapAggregator, HeatmapKind};
///
/// let mean = HeatmapAggregator::new(HeatmapKind::Mean, |v: &f64| *v);
/// let mut cell = Cell::new((0, 0).into());
/// let mut ctx = Context::new();
/// mean.aggregate(&mut cell, &100.0, 1.0, &mut ctx);
/// mean.aggregate(&mut cell, &50.0, 1.0, &mut ctx);
/// mean.post_aggregate(&mut [&mut cell], 20.0, &mut ctx);
/// assert_eq!(cell.scalar("value"), Some(75.0));
/// ```
pub struct HeatmapAggregator<R> {
    kind: HeatmapKind,
    value: Extract<R>,
    weight: Option<Extract<R>>,
    normalise: Option<Extract<R>>,
    autoscale: bool,
}

impl<R> HeatmapAggregator<R> {
    /// A heatmap of `kind` reading each record's value with `value`.
    ///
    /// Autoscale is on by default.
    pub fn new<F>(kind: HeatmapKind, value: F) -> Self
    where
        F: Fn(&R) -> f64 + Send + Sync + 'static,
    {
        Self {
            kind,
            value: Box::new(value),
            weight: None,
            normalise: None,
            autoscale: true,
        }
    }

    /// Per-record weight for [`HeatmapKind::WeightedMean`]. Ignored by
    /// the other kinds.
    pub fn with_weight<F>(mut self, weight: F) -> Self
    where
        F: Fn(&R) -> f64 + Send + Sync + 'static,
    {
        self.weight = Some(Box::new(weight));
        self
    }

    /// Divide each finished cell value by the summed denominator of its
    /// records (e.g. population for a per-capita rate).
    pub fn with_normalise<F>(mut self, denominator: F) -> Self
    where
        F: Fn(&R) -> f64 + Send + Sync + 'static,
    {
        self.normalise = Some(Box::new(denominator));
        self
    }

    /// Enable or disable publishing [`COLOUR_MAX`].
    pub fn with_autoscale(mut self, autoscale: bool) -> Self {
        self.autoscale = autoscale;
        self
    }

    /// The statistic this heatmap computes.
    pub fn kind(&self) -> HeatmapKind {
        self.kind
    }

    fn finish(&self, cell: &mut Cell) {
        let divisor = match self.kind {
            HeatmapKind::Mean => cell.scalar(COUNT),
            HeatmapKind::WeightedMean => cell.scalar(TOTAL_WEIGHT),
            HeatmapKind::Sum | HeatmapKind::Count => None,
        };
        if let Some(d) = divisor {
            divide_or_clear(cell, d);
        }
        if self.normalise.is_some() {
            let d = cell.scalar(DENOMINATOR).unwrap_or(0.0);
            divide_or_clear(cell, d);
        }
    }
}

/// Divide `value` by `d`, removing it when the result would not be finite.
fn divide_or_clear(cell: &mut Cell, d: f64) {
    let Some(v) = cell.scalar(VALUE) else {
        return;
    };
    let q = v / d;
    if q.is_finite() {
        cell.set(VALUE, q);
    } else {
        cell.remove(VALUE);
    }
}

/// Linear-interpolated quantile of an ascending slice.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let i = h.floor() as usize;
    let lo = sorted[i];
    Some(match sorted.get(i + 1) {
        Some(hi) => lo + (hi - lo) * (h - i as f64),
        None => lo,
    })
}

impl<R> Aggregator<R> for HeatmapAggregator<R> {
    fn aggregate(&self, cell: &mut Cell, record: &R, weight: f64, _ctx: &mut Context) {
        match self.kind {
            HeatmapKind::Mean | HeatmapKind::Sum => {
                let v = (self.value)(record);
                cell.accumulate(VALUE, finite_or_zero(v) * weight);
                cell.accumulate(COUNT, weight);
            }
            HeatmapKind::WeightedMean => {
                let v = (self.value)(record);
                let w = match &self.weight {
                    Some(f) => finite_or_zero(f(record)) * weight,
                    None => weight,
                };
                cell.accumulate(VALUE, finite_or_zero(v) * w);
                cell.accumulate(TOTAL_WEIGHT, w);
                cell.accumulate(COUNT, weight);
            }
            HeatmapKind::Count => {
                let n = cell.accumulate(COUNT, weight);
                cell.set(VALUE, n);
            }
        }
        if let Some(f) = &self.normalise {
            cell.accumulate(DENOMINATOR, finite_or_zero(f(record)) * weight);
        }
    }

    fn post_aggregate(&self, cells: &mut [&mut Cell], _cell_size: f64, ctx: &mut Context) {
        for cell in cells.iter_mut() {
            self.finish(cell);
        }
        if self.autoscale {
            let mut values: Vec<f64> = cells
                .iter()
                .map(|c| c.scalar(VALUE).unwrap_or(0.0))
                .collect();
            values.sort_by(f64::total_cmp);
            match quantile(&values, COLOUR_MAX_QUANTILE) {
                Some(max) => ctx.global.set(COLOUR_MAX, max),
                None => {
                    ctx.global.remove(COLOUR_MAX);
                }
            }
        }
    }

    fn smoothable_properties(&self) -> &[(&'static str, PropertyKind)] {
        SMOOTHABLE
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

impl<R> std::fmt::Debug for HeatmapAggregator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeatmapAggregator")
            .field("kind", &self.kind)
            .field("weighted", &self.weight.is_some())
            .field("normalised", &self.normalise.is_some())
            .field("autoscale", &self.autoscale)
            .finish()
    }
}
