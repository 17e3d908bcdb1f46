//! The [`Aggregator`] strategy trait.
//!
//! Aggregators are the pluggable half of an aggregation pass: the driver
//! decides which cells a datum lands in and with what weight, and each
//! aggregator decides what that means for the cell's properties.

use crate::cell::Cell;
use crate::context::Context;
use glyphgrid_core::PropertyKind;

/// Per-cell accumulation strategy for records of type `R`.
///
/// # Contract
///
/// - `aggregate()` is called once per `(cell, datum)` assignment, with
///   the assignment's weight. A datum may be assigned to several cells.
/// - `&self`: aggregators are stateless; running state lives in the
///   cells or in the [`Context`] scopes.
/// - Results are independent of data order only if `aggregate()` is a
///   commutative accumulation. The driver does not enforce this.
///
/// # Object safety
///
/// This trait is object-safe; the driver takes `&[&dyn Aggregator<R>]`
/// and calls them in order.
///
/// # Examples
///
/// A count aggregator that also tracks the largest count in the view:
///
/// ```
/// use glyphgrid_aggregate::{Aggregator, Cell, Context};
///
/// struct Count;
///
/// impl Aggregator<()> for Count {
///     fn aggregate(&self, cell: &mut Cell, _record: &(), weight: f64, _ctx: &mut Context) {
///         cell.accumulate("count", weight);
///     }
///
///     fn post_aggregate(&self, cells: &mut [&mut Cell], _cell_size: f64, ctx: &mut Context) {
///         for c in cells.iter() {
///             ctx.global.raise_max("max_count", c.scalar("count").unwrap_or(0.0));
///         }
///     }
/// }
///
/// let mut cell = Cell::new((0, 0).into());
/// let mut ctx = Context::new();
/// Count.aggregate(&mut cell, &(), 1.0, &mut ctx);
/// Count.post_aggregate(&mut [&mut cell], 20.0, &mut ctx);
/// assert_eq!(ctx.global.scalar("max_count"), Some(1.0));
/// ```
pub trait Aggregator<R: ?Sized> {
    /// Called once before any datum is assigned.
    ///
    /// Default: no-op.
    fn pre_aggregate(&self, _cell_size: f64, _ctx: &mut Context) {}

    /// Fold one weighted datum into `cell`.
    fn aggregate(&self, cell: &mut Cell, record: &R, weight: f64, ctx: &mut Context);

    /// Called once after every datum, with all populated cells in
    /// column-major order.
    ///
    /// Default: no-op.
    fn post_aggregate(&self, _cells: &mut [&mut Cell], _cell_size: f64, _ctx: &mut Context) {}

    /// Properties this aggregator produces that a smoother may redistribute.
    ///
    /// Default: none.
    fn smoothable_properties(&self) -> &[(&'static str, PropertyKind)] {
        &[]
    }
}

/// An [`Aggregator`] that only implements `aggregate()`, built from a closure.
///
/// ```
/// use glyphgrid_aggregate::{from_fn, Aggregator, Cell, Context};
///
/// let sum = from_fn(|cell: &mut Cell, v: &f64, w: f64, _ctx: &mut Context| {
///     cell.accumulate("value", v * w);
/// });
/// let mut cell = Cell::new((0, 0).into());
/// sum.aggregate(&mut cell, &4.0_f64, 0.5, &mut Context::new());
/// assert_eq!(cell.scalar("value"), Some(2.0));
/// ```
pub fn from_fn<R, F>(f: F) -> FnAggregator<F>
where
    R: ?Sized,
    F: Fn(&mut Cell, &R, f64, &mut Context),
{
    FnAggregator(f)
}

/// Closure-backed aggregator returned by [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnAggregator<F>(F);

impl<R, F> Aggregator<R> for FnAggregator<F>
where
    R: ?Sized,
    F: Fn(&mut Cell, &R, f64, &mut Context),
{
    fn aggregate(&self, cell: &mut Cell, record: &R, weight: f64, ctx: &mut Context) {
        (self.0)(cell, record, weight, ctx)
    }
}

impl<F> std::fmt::Debug for FnAggregator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnAggregator")
    }
}
