//! Separating axis tests for convex polygons.
//!
//! Axes are the edge normals of the polygons. Two convex polygons overlap iff
//! their projections overlap on every axis of both of them.

use super::Polygon;
use crate::math::Vector;

/// A polygon projected on an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub min: f32,
    pub max: f32,
}

impl Projection {
    /// Projects the vertices on `axis`. Empty input yields an inverted
    /// (min > max) projection which overlaps nothing.
    pub fn project(vertices: &[Vector], axis: Vector) -> Self {
        vertices.iter().fold(
            Projection {
                min: f32::INFINITY,
                max: f32::NEG_INFINITY,
            },
            |p, &v| {
                let d = axis.dot(v);
                Projection {
                    min: p.min.min(d),
                    max: p.max.max(d),
                }
            },
        )
    }

    /// Strict: touching intervals are separated.
    pub fn separated(&self, other: Self) -> bool {
        other.max <= self.min || self.max <= other.min
    }

    /// Signed distance to move `self` along the axis so that it stops
    /// overlapping `other`, taking the shorter way out. Also correct when one
    /// interval contains the other.
    pub fn push_out(&self, other: Self) -> f32 {
        let backward = self.max - other.min;
        let forward = other.max - self.min;
        if backward <= forward {
            -backward
        } else {
            forward
        }
    }

    pub fn overlap(&self, other: Self) -> f32 {
        self.push_out(other).abs()
    }
}

/// Unit normals of every non-degenerate edge of `poly`.
pub fn axes(poly: &Polygon) -> impl Iterator<Item = Vector> + '_ {
    let vs = poly.vertices();
    (0..vs.len()).filter_map(move |i| {
        let e = vs[(i + 1) % vs.len()] - vs[i];
        let len = e.length();
        if len == 0.0 {
            return None;
        }
        Some(Vector::new(e.y, -e.x) / len)
    })
}

/// True when no edge normal of `a` separates `b` from it.
/// Half of a full separating axis test, the other half being `no_separating_axis(b, a)`.
/// False if either polygon is not [`solid`](Polygon::solid).
pub fn no_separating_axis(a: &Polygon, b: &Polygon) -> bool {
    if !a.solid() || !b.solid() {
        return false;
    }
    axes(a).all(|axis| {
        let pa = Projection::project(a.vertices(), axis);
        let pb = Projection::project(b.vertices(), axis);
        !pa.separated(pb)
    })
}

/// Minimum translation vector to apply to `a` so that it stops overlapping `b`.
/// `None` if they are separated on some axis or one of them is not [`solid`](Polygon::solid).
pub fn penetration(a: &Polygon, b: &Polygon) -> Option<Vector> {
    if !a.solid() || !b.solid() {
        return None;
    }
    let mut best: Option<(f32, Vector)> = None;

    for axis in axes(a).chain(axes(b)) {
        let pa = Projection::project(a.vertices(), axis);
        let pb = Projection::project(b.vertices(), axis);
        if pa.separated(pb) {
            return None;
        }
        let push = pa.push_out(pb);
        if best.map_or(true, |(o, _)| push.abs() < o.abs()) {
            best = Some((push, axis));
        }
    }

    best.map(|(push, axis)| axis * push)
}
