//! Where a datum sits in world space.

use glyphgrid_core::{DatumError, Point};

/// World-space location of one datum, as returned by the caller's
/// location function.
#[derive(Clone, Debug, PartialEq)]
pub enum Location {
    /// A single coordinate.
    Point(Point),
    /// A geometric feature, assigned to every cell its bounding box covers.
    Feature(Geometry),
}

impl From<Point> for Location {
    fn from(p: Point) -> Self {
        Self::Point(p)
    }
}

impl From<(f64, f64)> for Location {
    fn from(p: (f64, f64)) -> Self {
        Self::Point(p.into())
    }
}

impl From<Geometry> for Location {
    fn from(g: Geometry) -> Self {
        Self::Feature(g)
    }
}

/// Feature geometry in world coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// Exterior ring of a polygon. The ring may or may not repeat its
    /// first vertex at the end.
    Polygon(Vec<Point>),
    /// An open polyline.
    LineString(Vec<Point>),
}

impl Geometry {
    /// All vertices.
    pub fn vertices(&self) -> &[Point] {
        match self {
            Self::Polygon(v) | Self::LineString(v) => v,
        }
    }

    /// Vertices without the closing duplicate of a polygon ring.
    fn distinct_vertices(&self) -> &[Point] {
        match self {
            Self::Polygon(v) if v.len() > 1 && v.first() == v.last() => &v[..v.len() - 1],
            other => other.vertices(),
        }
    }

    /// Axis-aligned bounding box as `(min, max)`.
    ///
    /// # Errors
    ///
    /// `EmptyGeometry` when there are no vertices; `NonFiniteCoordinate`
    /// when any vertex is NaN or infinite.
    pub fn bbox(&self) -> Result<(Point, Point), DatumError> {
        let vertices = self.vertices();
        if vertices.is_empty() {
            return Err(DatumError::EmptyGeometry);
        }
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in vertices {
            if !p.is_finite() {
                return Err(DatumError::NonFiniteCoordinate);
            }
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Ok((min, max))
    }

    /// Mean of the distinct vertices.
    ///
    /// # Errors
    ///
    /// Same conditions as [`bbox`](Self::bbox).
    pub fn centroid(&self) -> Result<Point, DatumError> {
        self.bbox()?;
        let vertices = self.distinct_vertices();
        let n = vertices.len() as f64;
        let (sx, sy) = vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Ok(Point::new(sx / n, sy / n))
    }
}
