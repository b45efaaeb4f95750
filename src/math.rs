use euclid::{Angle, Rotation2D, UnknownUnit};

/// 2D vector used for both positions and displacements.
pub type Vector = euclid::default::Vector2D<f32>;

/// Size of a rectangle.
pub type Size = euclid::default::Size2D<f32>;

/// Integer-grid rectangle, e.g. a tile range.
pub type Rect = euclid::default::Box2D<i32>;

const EPSILON: f32 = 1e-4;

/// Rotates `v` around the origin by `angle` radians.
pub fn rotate(v: Vector, angle: f32) -> Vector {
    Rotation2D::<f32, UnknownUnit, UnknownUnit>::radians(angle).transform_vector(v)
}

/// z component of the 3D cross product of `a` and `b`.
/// Positive when `b` turns clockwise from `a` on screen (y pointing down).
pub fn cross(a: Vector, b: Vector) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Folds an angle into `[0, 2π)`.
pub fn normalize_angle(radians: f32) -> f32 {
    let a = Angle::radians(radians).positive().radians;
    // `positive` can round up to exactly 2π for tiny negative inputs
    if a >= std::f32::consts::TAU {
        0.0
    } else {
        a
    }
}

pub fn float_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON * (1.0 + a.abs().max(b.abs()))
}

pub fn vector_eq(a: Vector, b: Vector) -> bool {
    float_eq(a.x, b.x) && float_eq(a.y, b.y)
}
