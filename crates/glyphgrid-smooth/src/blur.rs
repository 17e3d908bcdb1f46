//! Iterated separable box blur over square grids.
//!
//! Populated cells are split into regions whose bounds, expanded by the
//! radius, do not overlap. Each region is copied into its own dense
//! row-major field with empty cells at zero, so far-apart clusters never
//! share one large field. Each iteration runs a horizontal then a
//! vertical windowed-mean pass; reads past the field edge clamp to the
//! nearest edge cell.

use crate::error::SmoothError;
use crate::property::{check_kinds, SmoothProperty, SmoothReport};
use glyphgrid_aggregate::Grid;
use glyphgrid_core::{CellIndex, ConfigError, PropertyKind, Tessellation};

/// Default number of blur iterations.
pub const DEFAULT_BLUR_ITERATIONS: u32 = 3;

/// Box blur with a radius in cells and an iteration count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxBlur {
    radius: u32,
    iterations: u32,
}

impl BoxBlur {
    /// A blur of `radius` cells applied `iterations` times.
    pub fn new(radius: u32, iterations: u32) -> Self {
        Self { radius, iterations }
    }

    /// Blur radius in cells.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Number of passes.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Blur the scalar `properties` in place.
    ///
    /// Array properties are skipped and counted in
    /// [`SmoothReport::skipped_properties`]. Empty cells whose blurred value
    /// is positive become synthetic cells.
    ///
    /// # Errors
    ///
    /// - `Config(UnsupportedTessellation)` on hex grids.
    /// - `Config(MissingSmoothProperties)` when `properties` is empty.
    /// - `KindMismatch` when a cell's value does not match its declared
    ///   kind.
    pub fn smooth(
        &self,
        grid: &mut Grid,
        properties: &[SmoothProperty],
    ) -> Result<SmoothReport, SmoothError> {
        if grid.tessellation() != Tessellation::Grid {
            return Err(ConfigError::UnsupportedTessellation {
                operation: "box blur",
                tessellation: grid.tessellation(),
            }
            .into());
        }
        if properties.is_empty() {
            return Err(ConfigError::MissingSmoothProperties.into());
        }
        check_kinds(grid, properties)?;

        let mut report = SmoothReport::default();
        let regions = blur_regions(grid, self.radius);

        for p in properties {
            if p.kind == PropertyKind::Array {
                log::warn!("box blur skips array property '{}'", p.name);
                report.skipped_properties += 1;
                continue;
            }
            for &(min, max) in &regions {
                self.blur_region(grid, &p.name, min, max, &mut report);
            }
        }
        log::debug!(
            "box blur r={} x{}: {} values written, {} synthetic cells",
            self.radius,
            self.iterations,
            report.written,
            report.created
        );
        Ok(report)
    }

    /// Blur `name` over the inclusive index rectangle `min..=max`.
    fn blur_region(
        &self,
        grid: &mut Grid,
        name: &str,
        min: CellIndex,
        max: CellIndex,
        report: &mut SmoothReport,
    ) {
        let width = (i64::from(max.col) - i64::from(min.col) + 1) as usize;
        let height = (i64::from(max.row) - i64::from(min.row) + 1) as usize;
        let at = |x: usize, y: usize| min.offset(x as i32, y as i32);

        let mut field = vec![0.0; width * height];
        for y in 0..height {
            for x in 0..width {
                field[y * width + x] = grid
                    .get(at(x, y))
                    .and_then(|c| c.scalar(name))
                    .filter(|v| v.is_finite())
                    .unwrap_or(0.0);
            }
        }
        blur_field(&mut field, width, height, self.radius as usize, self.iterations);

        for y in 0..height {
            for x in 0..width {
                let index = at(x, y);
                let v = field[y * width + x];
                if v > 0.0 {
                    if !grid.contains(index) {
                        report.created += 1;
                    }
                    grid.get_or_insert_synthetic(index).set(name, v);
                    report.written += 1;
                } else if let Some(cell) = grid.get_mut(index) {
                    if cell.get(name).is_some() {
                        cell.set(name, v);
                        report.written += 1;
                    }
                }
            }
        }
    }
}

/// Group populated cells into regions whose bounds, expanded by `radius`,
/// are pairwise disjoint, and return those expanded bounds.
///
/// Groups are cut recursively wherever the sorted columns, then rows,
/// leave a gap wider than `2 * radius`.
fn blur_regions(grid: &Grid, radius: u32) -> Vec<(CellIndex, CellIndex)> {
    let gap = 2 * i64::from(radius);
    let r = radius.min(i32::MAX as u32) as i32;
    let mut regions = Vec::new();
    let mut pending = vec![grid.indices().copied().collect::<Vec<_>>()];
    while let Some(group) = pending.pop() {
        let mut parts = split_on_gaps(group, gap, |i| i.col);
        if parts.len() == 1 {
            parts = split_on_gaps(parts.remove(0), gap, |i| i.row);
        }
        if parts.len() > 1 {
            pending.extend(parts);
            continue;
        }
        let Some(group) = parts.pop() else {
            continue;
        };
        let Some(&first) = group.first() else {
            continue;
        };
        let (min, max) = group.iter().fold((first, first), |(lo, hi), i| {
            (
                CellIndex::new(lo.col.min(i.col), lo.row.min(i.row)),
                CellIndex::new(hi.col.max(i.col), hi.row.max(i.row)),
            )
        });
        regions.push((min.offset(-r, -r), max.offset(r, r)));
    }
    regions.sort();
    regions
}

/// Sort `group` by `key` and cut it wherever consecutive keys differ by
/// more than `gap`.
fn split_on_gaps(
    mut group: Vec<CellIndex>,
    gap: i64,
    key: impl Fn(&CellIndex) -> i32,
) -> Vec<Vec<CellIndex>> {
    group.sort_by_key(&key);
    let mut parts = Vec::new();
    let mut current: Vec<CellIndex> = Vec::new();
    for i in group {
        if let Some(prev) = current.last() {
            if i64::from(key(&i)) - i64::from(key(prev)) > gap {
                parts.push(std::mem::take(&mut current));
            }
        }
        current.push(i);
    }
    parts.push(current);
    parts
}

/// Blur a row-major `width` x `height` field in place.
pub fn blur_field(field: &mut [f64], width: usize, height: usize, radius: usize, iterations: u32) {
    if radius == 0 || width == 0 || height == 0 {
        return;
    }
    let mut scratch = vec![0.0; width.max(height)];
    for _ in 0..iterations {
        for y in 0..height {
            let row = &mut field[y * width..(y + 1) * width];
            box_pass(row, 1, width, radius, &mut scratch);
        }
        for x in 0..width {
            box_pass(&mut field[x..], width, height, radius, &mut scratch);
        }
    }
}

/// One windowed-mean pass over `len` values spaced `stride` apart.
///
/// Each window is summed directly so regions of exact zeros stay exact.
fn box_pass(values: &mut [f64], stride: usize, len: usize, radius: usize, scratch: &mut [f64]) {
    let r = radius as isize;
    let last = len as isize - 1;
    let n = (2 * radius + 1) as f64;
    for (i, out) in scratch.iter_mut().take(len).enumerate() {
        let i = i as isize;
        let sum: f64 = (i - r..=i + r)
            .map(|j| values[j.clamp(0, last) as usize * stride])
            .sum();
        *out = sum / n;
    }
    for (i, v) in scratch.iter().take(len).enumerate() {
        values[i * stride] = *v;
    }
}
