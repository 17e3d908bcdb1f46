//! The aggregation driver.
//!
//! [`Aggregation`] validates its configuration against the discretizer
//! once, then [`run`](Aggregation::run) turns a data sequence into a fresh
//! [`Grid`]. Per datum:
//!
//! 1. Resolve the datum's [`Location`] to screen space and shift it by
//!    the grid offsets.
//! 2. Turn it into `(cell, weight)` assignments ([`crate::assign`]).
//! 3. Create each target cell on first use and hand it to every
//!    aggregator in order.
//!
//! Malformed data are skipped and reported in the
//! [`AggregationSummary`]; they never abort the pass.

use crate::aggregator::Aggregator;
use crate::assign::{self, Assignments};
use crate::cell::Cell;
use crate::config::{AggregationConfig, AssignmentMode, Origin, Viewport};
use crate::context::Context;
use crate::grid::Grid;
use crate::location::Location;
use crate::projection::Projection;
use crate::summary::{AggregationOutput, AggregationSummary, WorldExtent};
use glyphgrid_core::{ConfigError, DatumError, Point, Tessellation};
use glyphgrid_space::Discretizer;
use std::sync::Arc;

/// A validated aggregation setup bound to one discretizer and projection.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use glyphgrid_aggregate::{from_fn, Aggregation, AggregationConfig, Cell, Context, IdentityProjection, Location};
/// use glyphgrid_core::Point;
/// use glyphgrid_space::SquareDiscretizer;
///
/// let d = Arc::new(SquareDiscretizer::new(20.0).unwrap());
/// let config = AggregationConfig::builder().cell_size(20.0).build().unwrap();
/// let agg = Aggregation::new(d, &config, &IdentityProjection).unwrap();
///
/// let data = [(10.0, 10.0), (15.0, 15.0), (60.0, 65.0)];
/// let count = from_fn(|cell: &mut Cell, _: &(f64, f64), w: f64, _: &mut Context| {
///     cell.accumulate("count", w);
/// });
/// let out = agg.run(&data, |p| Location::from(*p), &[&count], &mut Context::new());
///
/// assert_eq!(out.grid.len(), 2);
/// assert_eq!(out.grid.cell(0, 0).unwrap().scalar("count"), Some(2.0));
/// assert_eq!(out.grid.cell(3, 3).unwrap().scalar("count"), Some(1.0));
/// ```
pub struct Aggregation<'a> {
    discretizer: Arc<dyn Discretizer>,
    config: &'a AggregationConfig,
    projection: &'a dyn Projection,
    x_offset: f64,
    y_offset: f64,
}

impl<'a> Aggregation<'a> {
    /// Check `config` against `discretizer` and resolve the grid offsets.
    ///
    /// # Errors
    ///
    /// - `CellSizeMismatch` when the config and discretizer disagree.
    /// - `UnsupportedTessellation` for MAUP reduction on a hex grid.
    /// - `InvalidOrigin` when a relative origin projects to a non-finite
    ///   screen position.
    pub fn new(
        discretizer: Arc<dyn Discretizer>,
        config: &'a AggregationConfig,
        projection: &'a dyn Projection,
    ) -> Result<Self, ConfigError> {
        let cell_size = config.cell_size();
        if discretizer.cell_size() != cell_size {
            return Err(ConfigError::CellSizeMismatch {
                configured: cell_size,
                discretizer: discretizer.cell_size(),
            });
        }
        if config.mode() == AssignmentMode::ReduceMaup
            && discretizer.tessellation() == Tessellation::Hex
        {
            return Err(ConfigError::UnsupportedTessellation {
                operation: "MAUP reduction",
                tessellation: Tessellation::Hex,
            });
        }
        let (x_offset, y_offset) = match config.origin() {
            Origin::World => (0.0, 0.0),
            Origin::RelativeTo(reference) => {
                let s = projection.to_screen(reference);
                if !s.is_finite() {
                    return Err(ConfigError::InvalidOrigin);
                }
                ((s.x % cell_size).trunc(), (s.y % cell_size).trunc())
            }
        };
        Ok(Self {
            discretizer,
            config,
            projection,
            x_offset,
            y_offset,
        })
    }

    /// Horizontal and vertical shift of the tessellation origin.
    pub fn offsets(&self) -> (f64, f64) {
        (self.x_offset, self.y_offset)
    }

    /// Aggregate `data` into a new grid.
    ///
    /// `locate` maps each record to its world-space location. Every
    /// aggregator's `pre_aggregate` runs first, then `aggregate` for each
    /// assignment (aggregators in slice order), then `post_aggregate`
    /// once with all cells.
    pub fn run<R, L>(
        &self,
        data: &[R],
        locate: L,
        aggregators: &[&dyn Aggregator<R>],
        ctx: &mut Context,
    ) -> AggregationOutput
    where
        L: Fn(&R) -> Location,
    {
        let cell_size = self.config.cell_size();
        let mut grid = Grid::new(Arc::clone(&self.discretizer), self.x_offset, self.y_offset);
        let mut summary = AggregationSummary {
            world_extent: self.config.viewport().map(|v| self.world_extent(v)),
            ..AggregationSummary::default()
        };

        log::debug!(
            "aggregating {} data into {} cells of size {cell_size} ({:?})",
            data.len(),
            grid.tessellation(),
            self.config.mode()
        );

        for a in aggregators {
            a.pre_aggregate(cell_size, ctx);
        }

        for (i, datum) in data.iter().enumerate() {
            summary.processed += 1;
            let assignments = match self.resolve(&locate(datum)) {
                Ok(a) => a,
                Err(e) => {
                    log::trace!("skipping datum {i}: {e}");
                    summary.skipped.push((i, e));
                    continue;
                }
            };
            for (index, weight) in assignments {
                let cell = grid.get_or_insert(index);
                for a in aggregators {
                    a.aggregate(cell, datum, weight, ctx);
                }
                summary.assignments += 1;
            }
        }

        let mut cells: Vec<&mut Cell> = grid.iter_mut().collect();
        for a in aggregators {
            a.post_aggregate(&mut cells, cell_size, ctx);
        }

        if !summary.skipped.is_empty() {
            log::warn!(
                "skipped {} of {} data with unusable locations",
                summary.skipped.len(),
                summary.processed
            );
        }
        log::debug!(
            "aggregation produced {} cells from {} assignments",
            grid.len(),
            summary.assignments
        );

        AggregationOutput { grid, summary }
    }

    /// World point to offset-adjusted screen point with an exact cell index.
    fn to_grid_space(&self, world: Point) -> Result<Point, DatumError> {
        if !world.is_finite() {
            return Err(DatumError::NonFiniteCoordinate);
        }
        let screen = self.projection.to_screen(world);
        if !screen.is_finite() {
            return Err(DatumError::NonFiniteProjection);
        }
        let p = screen.offset(-self.x_offset, -self.y_offset);
        if !self.discretizer.is_addressable(p) {
            return Err(DatumError::IndexOutOfRange);
        }
        Ok(p)
    }

    fn resolve(&self, location: &Location) -> Result<Assignments, DatumError> {
        let d = self.discretizer.as_ref();
        match location {
            Location::Point(world) => {
                let p = self.to_grid_space(*world)?;
                Ok(match self.config.mode() {
                    AssignmentMode::Single => assign::single(d, p),
                    AssignmentMode::OffsetOversample => assign::oversample(d, p),
                    AssignmentMode::ReduceMaup => assign::reduce_maup(d, p),
                })
            }
            Location::Feature(geometry) => {
                let (wmin, wmax) = geometry.bbox()?;
                let a = self.to_grid_space(wmin)?;
                let b = self.to_grid_space(wmax)?;
                let min = Point::new(a.x.min(b.x), a.y.min(b.y));
                let max = Point::new(a.x.max(b.x), a.y.max(b.y));
                let cells = assign::feature_cells(d, min, max);
                if !cells.is_empty() {
                    return Ok(cells);
                }
                let c = self.to_grid_space(geometry.centroid()?)?;
                Ok(assign::single(d, c))
            }
        }
    }

    fn world_extent(&self, viewport: Viewport) -> WorldExtent {
        let a = self.projection.to_world(Point::new(0.0, 0.0));
        let b = self
            .projection
            .to_world(Point::new(viewport.width, viewport.height));
        WorldExtent {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }
}

impl std::fmt::Debug for Aggregation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregation")
            .field("tessellation", &self.discretizer.tessellation())
            .field("config", self.config)
            .field("x_offset", &self.x_offset)
            .field("y_offset", &self.y_offset)
            .finish()
    }
}
