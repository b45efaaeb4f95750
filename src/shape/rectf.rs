use super::{sat, Polygon, Shape, ShapeRef};
use crate::math::{Rect, Size, Vector};
use euclid::point2;
use std::fmt;

/// Axis-aligned rectangle in screen coordinates (y pointing down), stored as
/// its top-left corner and its size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rectf {
    p1: Vector,
    size: Size,
}

impl Rectf {
    /// Swapped sides are put back in order.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::from_corners(Vector::new(left, top), Vector::new(right, bottom))
    }

    pub fn from_size(p1: Vector, size: Size) -> Self {
        Self { p1, size }
    }

    /// Rectangle spanning two opposite corners, in any order.
    pub fn from_corners(a: Vector, b: Vector) -> Self {
        let p1 = a.min(b);
        let p2 = a.max(b);
        Self {
            p1,
            size: Size::new(p2.x - p1.x, p2.y - p1.y),
        }
    }

    pub fn left(&self) -> f32 {
        self.p1.x
    }

    pub fn top(&self) -> f32 {
        self.p1.y
    }

    pub fn right(&self) -> f32 {
        self.p1.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.p1.y + self.size.height
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Top-left corner.
    pub fn p1(&self) -> Vector {
        self.p1
    }

    /// Bottom-right corner.
    pub fn p2(&self) -> Vector {
        Vector::new(self.right(), self.bottom())
    }

    pub fn middle(&self) -> Vector {
        Vector::new(
            self.p1.x + self.size.width / 2.0,
            self.p1.y + self.size.height / 2.0,
        )
    }

    pub fn set_pos(&mut self, p1: Vector) {
        self.p1 = p1;
    }

    pub fn moved(&self, v: Vector) -> Self {
        Self {
            p1: self.p1 + v,
            size: self.size,
        }
    }

    /// Grows every side by `border` (shrinks when negative).
    pub fn grown(&self, border: f32) -> Self {
        Self::new(
            self.left() - border,
            self.top() - border,
            self.right() + border,
            self.bottom() + border,
        )
    }

    /// Inclusive of the borders.
    pub fn contains(&self, p: Vector) -> bool {
        p.x >= self.left() && p.y >= self.top() && p.x <= self.right() && p.y <= self.bottom()
    }

    /// Strict overlap: rectangles that only share an edge or a corner don't overlap.
    pub fn overlaps(&self, other: &Rectf) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Smallest integer rectangle covering this one.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            point2(self.left().floor() as i32, self.top().floor() as i32),
            point2(self.right().ceil() as i32, self.bottom().ceil() as i32),
        )
    }

    /// The rectangle as a 4-vertex polygon, translated to the top-left corner.
    pub fn as_polygon(&self) -> Polygon {
        let (w, h) = (self.size.width, self.size.height);
        Polygon::with_transform(
            vec![
                Vector::new(0.0, 0.0),
                Vector::new(w, 0.0),
                Vector::new(w, h),
                Vector::new(0.0, h),
            ],
            self.p1,
            0.0,
        )
    }
}

impl From<Rect> for Rectf {
    fn from(rect: Rect) -> Self {
        Self::new(
            rect.min.x as f32,
            rect.min.y as f32,
            rect.max.x as f32,
            rect.max.y as f32,
        )
    }
}

impl Shape for Rectf {
    fn bounding_box(&self) -> Rectf {
        *self
    }

    fn intersects(&self, other: ShapeRef<'_>) -> bool {
        if !matches!(other, ShapeRef::Rectf(_)) && !self.overlaps(&other.bounding_box()) {
            return false;
        }
        self.partial_intersection_check(other) && other.partial_intersection_check(self.as_shape())
    }

    fn penetration_vector(&self, other: ShapeRef<'_>) -> Vector {
        match other {
            ShapeRef::Rectf(o) => {
                if !self.overlaps(o) {
                    return Vector::zero();
                }
                let push_x = sat::Projection {
                    min: self.left(),
                    max: self.right(),
                }
                .push_out(sat::Projection {
                    min: o.left(),
                    max: o.right(),
                });
                let push_y = sat::Projection {
                    min: self.top(),
                    max: self.bottom(),
                }
                .push_out(sat::Projection {
                    min: o.top(),
                    max: o.bottom(),
                });
                if push_x.abs() <= push_y.abs() {
                    Vector::new(push_x, 0.0)
                } else {
                    Vector::new(0.0, push_y)
                }
            }
            ShapeRef::Polygon(p) => {
                sat::penetration(&self.as_polygon(), p).unwrap_or_else(Vector::zero)
            }
        }
    }

    fn partial_intersection_check(&self, other: ShapeRef<'_>) -> bool {
        match other {
            // one-sided: `other` starts before `self` ends on both axes
            ShapeRef::Rectf(o) => o.left() < self.right() && o.top() < self.bottom(),
            ShapeRef::Polygon(_) => self.as_polygon().partial_intersection_check(other),
        }
    }

    fn as_shape(&self) -> ShapeRef<'_> {
        ShapeRef::Rectf(self)
    }
}

impl fmt::Display for Rectf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rectf({}, {}, {}, {})",
            self.left(),
            self.top(),
            self.right(),
            self.bottom()
        )
    }
}
