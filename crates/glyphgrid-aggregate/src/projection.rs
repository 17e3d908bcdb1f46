//! World/screen coordinate transforms supplied by the map collaborator.

use glyphgrid_core::Point;

/// Forward and inverse transform between world and screen space.
///
/// The driver projects every datum with [`to_screen`](Self::to_screen)
/// before discretizing, and uses [`to_world`](Self::to_world) only to
/// report the viewport's world extent.
pub trait Projection {
    /// World coordinate to screen pixels.
    fn to_screen(&self, world: Point) -> Point;

    /// Screen pixels to world coordinate.
    fn to_world(&self, screen: Point) -> Point;
}

/// Screen space equals world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IdentityProjection;

impl Projection for IdentityProjection {
    fn to_screen(&self, world: Point) -> Point {
        world
    }

    fn to_world(&self, screen: Point) -> Point {
        screen
    }
}

/// A projection built from a pair of closures.
///
/// ```
/// use glyphgrid_aggregate::{FnProjection, Projection};
/// use glyphgrid_core::Point;
///
/// let p = FnProjection::new(
///     |w: Point| Point::new(w.x * 2.0, w.y * 2.0),
///     |s: Point| Point::new(s.x / 2.0, s.y / 2.0),
/// );
/// assert_eq!(p.to_screen(Point::new(1.0, 3.0)), Point::new(2.0, 6.0));
/// ```
#[derive(Clone, Copy)]
pub struct FnProjection<F, G> {
    forward: F,
    inverse: G,
}

impl<F, G> FnProjection<F, G>
where
    F: Fn(Point) -> Point,
    G: Fn(Point) -> Point,
{
    /// Wrap a forward and an inverse transform.
    pub fn new(forward: F, inverse: G) -> Self {
        Self { forward, inverse }
    }
}

impl<F, G> Projection for FnProjection<F, G>
where
    F: Fn(Point) -> Point,
    G: Fn(Point) -> Point,
{
    fn to_screen(&self, world: Point) -> Point {
        (self.forward)(world)
    }

    fn to_world(&self, screen: Point) -> Point {
        (self.inverse)(screen)
    }
}

impl<F, G> std::fmt::Debug for FnProjection<F, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnProjection")
    }
}
