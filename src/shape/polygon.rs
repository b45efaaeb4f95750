use super::{sat, Rectf, Shape, ShapeRef};
use crate::error::ShapeError;
use crate::math::{cross, normalize_angle, rotate, Vector};
use std::fmt;

/// Relative to the bounding box area.
const AREA_EPSILON: f32 = 1e-6;

/// A convex polygon under translation and rotation.
///
/// Only convex polygons whose vertices turn clockwise on screen (positive
/// cross products with y pointing down) are [`valid`](Polygon::valid).
/// Anything else, and valid polygons without area (all vertices on one line),
/// never contains a point nor intersects another shape.
///
/// World-space vertices are cached and kept in sync by the transform setters.
///
/// ```rust
/// use flat_collide::{Polygon, Vector};
///
/// let mut p = Polygon::new(vec![
///     Vector::new(0.0, 0.0),
///     Vector::new(1.0, 0.0),
///     Vector::new(1.0, 1.0),
///     Vector::new(0.0, 1.0),
/// ]);
/// assert!(p.valid());
/// assert!(p.contains(Vector::new(0.5, 0.5)));
///
/// p.set_translation(Vector::new(10.0, 0.0));
/// assert!(!p.contains(Vector::new(0.5, 0.5)));
/// assert_eq!(p.vertex(-1), Some(Vector::new(10.0, 1.0)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "PolygonDef", into = "PolygonDef")
)]
pub struct Polygon {
    untransformed: Vec<Vector>,
    translation: Vector,
    rotation: f32,
    transformed: Vec<Vector>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vector>) -> Self {
        Self {
            transformed: vertices.clone(),
            untransformed: vertices,
            translation: Vector::zero(),
            rotation: 0.0,
        }
    }

    /// Same as `new` followed by `set_translation` and `set_rotation`.
    pub fn with_transform(vertices: Vec<Vector>, translation: Vector, rotation: f32) -> Self {
        let mut p = Self::new(vertices);
        p.set_translation(translation);
        p.set_rotation(rotation);
        p
    }

    /// Copies the local shape of `other` under a new transform.
    pub fn from_polygon(other: &Polygon, translation: Vector, rotation: f32) -> Self {
        Self::with_transform(other.untransformed.clone(), translation, rotation)
    }

    /// Builds a polygon, rejecting anything that would not be [`valid`](Polygon::valid).
    pub fn convex(vertices: Vec<Vector>) -> Result<Self, ShapeError> {
        let p = Self::new(vertices);
        if let Err(e) = p.check() {
            log::debug!("rejected polygon: {}", e);
            return Err(e);
        }
        Ok(p)
    }

    pub fn set_translation(&mut self, translation: Vector) {
        self.translation = translation;
        self.update_vertices();
    }

    /// Moves the polygon by `delta` without recomputing it from its local shape.
    pub fn add_translation(&mut self, delta: Vector) {
        self.translation += delta;
        // rotation changes always recompute the cache, so it is expressed in the
        // current rotation and shifting it is enough
        for v in &mut self.transformed {
            *v += delta;
        }
        debug_assert!(self.cache_in_sync());
    }

    pub fn translation(&self) -> Vector {
        self.translation
    }

    /// Stored modulo a full turn, in `[0, 2π)`.
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = normalize_angle(rotation);
        self.update_vertices();
    }

    pub fn add_rotation(&mut self, delta: f32) {
        self.set_rotation(self.rotation + delta);
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn count(&self) -> usize {
        self.untransformed.len()
    }

    /// Object-space vertices.
    pub fn local_vertices(&self) -> &[Vector] {
        &self.untransformed
    }

    /// World-space vertices.
    pub fn vertices(&self) -> &[Vector] {
        &self.transformed
    }

    /// World-space vertex, wrapping around in both directions.
    /// `None` for a polygon without vertices.
    pub fn vertex(&self, ordinal: isize) -> Option<Vector> {
        let n = self.transformed.len();
        if n == 0 {
            return None;
        }
        Some(self.transformed[ordinal.rem_euclid(n as isize) as usize])
    }

    /// The edge going from vertex `ordinal` to the next one.
    pub fn edge(&self, ordinal: isize) -> Option<(Vector, Vector)> {
        let n = self.transformed.len();
        if n == 0 {
            return None;
        }
        let i = ordinal.rem_euclid(n as isize) as usize;
        Some((self.transformed[i], self.transformed[(i + 1) % n]))
    }

    pub fn bounding_box(&self) -> Rectf {
        let mut it = self.transformed.iter();
        let first = match it.next() {
            Some(&v) => v,
            None => return Rectf::from_corners(self.translation, self.translation),
        };
        let (min, max) = it.fold((first, first), |(min, max), &v| (min.min(v), max.max(v)));
        Rectf::from_corners(min, max)
    }

    /// At least 3 vertices, and every corner turns the same (clockwise) way.
    /// Collinear corners are accepted.
    pub fn valid(&self) -> bool {
        self.check().is_ok()
    }

    fn check(&self) -> Result<(), ShapeError> {
        let n = self.transformed.len();
        if n < 3 {
            return Err(ShapeError::TooFewVertices(n));
        }
        let vs = &self.transformed;
        for i in 0..n {
            let e1 = vs[(i + 1) % n] - vs[i];
            let e2 = vs[(i + 2) % n] - vs[(i + 1) % n];
            if cross(e1, e2) < 0.0 {
                return Err(ShapeError::NotConvex {
                    vertex: (i + 1) % n,
                });
            }
        }
        Ok(())
    }

    /// [`valid`](Polygon::valid) and enclosing some area. Vertices that all sit
    /// on one line or one point make a valid polygon that covers nothing.
    pub fn solid(&self) -> bool {
        self.valid() && self.has_area()
    }

    fn has_area(&self) -> bool {
        let vs = &self.transformed;
        let origin = match vs.first() {
            Some(&v) => v,
            None => return false,
        };
        let twice_area: f32 = vs
            .windows(2)
            .map(|w| cross(w[0] - origin, w[1] - origin))
            .sum();
        let bbox = self.bounding_box();
        twice_area > AREA_EPSILON * bbox.width() * bbox.height()
    }

    /// Points on an edge are contained. Polygons that are not
    /// [`solid`](Polygon::solid) contain nothing.
    pub fn contains(&self, point: Vector) -> bool {
        if !self.solid() {
            return false;
        }
        let vs = &self.transformed;
        let n = vs.len();
        (0..n).all(|i| cross(vs[i] - point, vs[(i + 1) % n] - point) >= 0.0)
    }

    /// True when every local vertex sits at the origin, whatever their count.
    pub fn empty(&self) -> bool {
        self.untransformed.iter().all(|v| *v == Vector::zero())
    }

    fn update_vertices(&mut self) {
        let rotation = self.rotation;
        let translation = self.translation;
        self.transformed.clear();
        self.transformed.extend(
            self.untransformed
                .iter()
                .map(|&v| rotate(v, rotation) + translation),
        );
    }

    fn cache_in_sync(&self) -> bool {
        match (self.untransformed.first(), self.transformed.first()) {
            (Some(&local), Some(&world)) => {
                let expected = rotate(local, self.rotation) + self.translation;
                (expected - world).length() <= 1e-3 * (1.0 + expected.length())
            }
            _ => self.transformed.len() == self.untransformed.len(),
        }
    }
}

impl From<Vec<Vector>> for Polygon {
    fn from(vertices: Vec<Vector>) -> Self {
        Self::new(vertices)
    }
}

impl Shape for Polygon {
    fn bounding_box(&self) -> Rectf {
        Polygon::bounding_box(self)
    }

    fn intersects(&self, other: ShapeRef<'_>) -> bool {
        if !self.solid() {
            log::debug!("intersection test on degenerate {}", self);
            return false;
        }
        if !self.bounding_box().overlaps(&other.bounding_box()) {
            return false;
        }
        self.partial_intersection_check(other) && other.partial_intersection_check(self.as_shape())
    }

    fn penetration_vector(&self, other: ShapeRef<'_>) -> Vector {
        let mtv = match other {
            ShapeRef::Polygon(p) => sat::penetration(self, p),
            ShapeRef::Rectf(r) => sat::penetration(self, &r.as_polygon()),
        };
        mtv.unwrap_or_else(Vector::zero)
    }

    fn partial_intersection_check(&self, other: ShapeRef<'_>) -> bool {
        match other {
            ShapeRef::Polygon(p) => sat::no_separating_axis(self, p),
            ShapeRef::Rectf(r) => sat::no_separating_axis(self, &r.as_polygon()),
        }
    }

    fn as_shape(&self) -> ShapeRef<'_> {
        ShapeRef::Polygon(self)
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Polygon([{} vertices], translation: ({}, {}), rotation: {})",
            self.count(),
            self.translation.x,
            self.translation.y,
            self.rotation
        )
    }
}

/// Serialized form: the world-space cache is rebuilt on load.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct PolygonDef {
    vertices: Vec<Vector>,
    translation: Vector,
    rotation: f32,
}

#[cfg(feature = "serde")]
impl From<PolygonDef> for Polygon {
    fn from(def: PolygonDef) -> Self {
        Polygon::with_transform(def.vertices, def.translation, def.rotation)
    }
}

#[cfg(feature = "serde")]
impl From<Polygon> for PolygonDef {
    fn from(p: Polygon) -> Self {
        PolygonDef {
            vertices: p.untransformed,
            translation: p.translation,
            rotation: p.rotation,
        }
    }
}
