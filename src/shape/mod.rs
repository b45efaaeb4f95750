use crate::math::Vector;

mod polygon;
mod rectf;
pub mod sat;

pub use polygon::*;
pub use rectf::*;

/// Borrowed view of any shape, used to dispatch on the pair of concrete
/// types in intersection tests.
#[derive(Clone, Copy, Debug)]
pub enum ShapeRef<'a> {
    Polygon(&'a Polygon),
    Rectf(&'a Rectf),
}

/// Owned shape of either kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeKind {
    Polygon(Polygon),
    Rectf(Rectf),
}

/// What the collision layer needs from a shape.
///
/// Intersection is symmetric: `a.intersects(b.as_shape())` equals
/// `b.intersects(a.as_shape())`. Shapes that only touch (share an edge or a
/// corner) do not intersect.
pub trait Shape {
    fn bounding_box(&self) -> Rectf;

    fn intersects(&self, other: ShapeRef<'_>) -> bool;

    /// Displacement to apply to `self` so that it stops overlapping `other`,
    /// along the axis of least overlap. Zero when they don't intersect.
    fn penetration_vector(&self, other: ShapeRef<'_>) -> Vector;

    /// One direction of the intersection test: true unless `self` alone can
    /// prove that `other` is outside of it. `intersects` requires it to hold
    /// both ways.
    fn partial_intersection_check(&self, other: ShapeRef<'_>) -> bool;

    fn as_shape(&self) -> ShapeRef<'_>;
}

/// Same as `a.intersects(b.as_shape())`.
pub fn intersect(a: &impl Shape, b: &impl Shape) -> bool {
    a.intersects(b.as_shape())
}

impl Shape for ShapeRef<'_> {
    fn bounding_box(&self) -> Rectf {
        match *self {
            ShapeRef::Polygon(p) => p.bounding_box(),
            ShapeRef::Rectf(r) => *r,
        }
    }

    fn intersects(&self, other: ShapeRef<'_>) -> bool {
        match *self {
            ShapeRef::Polygon(p) => p.intersects(other),
            ShapeRef::Rectf(r) => r.intersects(other),
        }
    }

    fn penetration_vector(&self, other: ShapeRef<'_>) -> Vector {
        match *self {
            ShapeRef::Polygon(p) => p.penetration_vector(other),
            ShapeRef::Rectf(r) => r.penetration_vector(other),
        }
    }

    fn partial_intersection_check(&self, other: ShapeRef<'_>) -> bool {
        match *self {
            ShapeRef::Polygon(p) => p.partial_intersection_check(other),
            ShapeRef::Rectf(r) => r.partial_intersection_check(other),
        }
    }

    fn as_shape(&self) -> ShapeRef<'_> {
        *self
    }
}

impl ShapeKind {
    /// Moves the shape by `delta`.
    pub fn translate(&mut self, delta: Vector) {
        match self {
            ShapeKind::Polygon(p) => p.add_translation(delta),
            ShapeKind::Rectf(r) => *r = r.moved(delta),
        }
    }
}

impl Shape for ShapeKind {
    fn bounding_box(&self) -> Rectf {
        self.as_shape().bounding_box()
    }

    fn intersects(&self, other: ShapeRef<'_>) -> bool {
        self.as_shape().intersects(other)
    }

    fn penetration_vector(&self, other: ShapeRef<'_>) -> Vector {
        self.as_shape().penetration_vector(other)
    }

    fn partial_intersection_check(&self, other: ShapeRef<'_>) -> bool {
        self.as_shape().partial_intersection_check(other)
    }

    fn as_shape(&self) -> ShapeRef<'_> {
        match self {
            ShapeKind::Polygon(p) => ShapeRef::Polygon(p),
            ShapeKind::Rectf(r) => ShapeRef::Rectf(r),
        }
    }
}

impl From<Polygon> for ShapeKind {
    fn from(p: Polygon) -> Self {
        ShapeKind::Polygon(p)
    }
}

impl From<Rectf> for ShapeKind {
    fn from(r: Rectf) -> Self {
        ShapeKind::Rectf(r)
    }
}

impl<'a> From<&'a Polygon> for ShapeRef<'a> {
    fn from(p: &'a Polygon) -> Self {
        ShapeRef::Polygon(p)
    }
}

impl<'a> From<&'a Rectf> for ShapeRef<'a> {
    fn from(r: &'a Rectf) -> Self {
        ShapeRef::Rectf(r)
    }
}
