//! Primitive collision shapes and intersection algorithms
//!
//! Provides the player capsule, projectile spheres and static level triangles,
//! along with the narrow-phase tests the world collider runs against them.

use crate::foundation::math::{utils, Vec3};
use crate::spatial::AABB;

/// Below this squared length a direction is treated as undefined
const DIRECTION_EPSILON: f32 = 1e-12;

/// Contact reported by a world query
///
/// `normal` is a unit vector pointing out of the surface, toward the queried
/// shape. `depth` is how far the shape must move along `normal` to stop
/// penetrating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Surface normal (unit length)
    pub normal: Vec3,
    /// Penetration depth, never negative
    pub depth: f32,
}

impl Contact {
    /// Creates a new contact
    pub fn new(normal: Vec3, depth: f32) -> Self {
        Self { normal, depth }
    }

    /// Displacement that separates the shape from the surface
    pub fn correction(&self) -> Vec3 {
        self.normal * self.depth
    }
}

/// A capsule: a line segment swept by a sphere
///
/// The segment length never changes at runtime; the capsule is only
/// translated or reset to a pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    /// Bottom sphere center
    pub start: Vec3,
    /// Top sphere center
    pub end: Vec3,
    /// Radius of the swept sphere
    pub radius: f32,
}

impl Capsule {
    /// Creates a new capsule
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self { start, end, radius }
    }

    /// Midpoint of the segment
    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// Move the whole capsule
    pub fn translate(&mut self, delta: Vec3) {
        self.start += delta;
        self.end += delta;
    }

    /// The three points standing in for the capsule when colliding with spheres:
    /// segment start, segment end and midpoint
    pub fn sample_points(&self) -> [Vec3; 3] {
        [self.start, self.end, self.center()]
    }

    /// World-space bounds including the radius
    pub fn bounds(&self) -> AABB {
        AABB::new(self.start.inf(&self.end), self.start.sup(&self.end)).expanded(self.radius)
    }
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// World-space bounds
    pub fn bounds(&self) -> AABB {
        AABB::from_center_extents(self.center, Vec3::repeat(self.radius))
    }
}

/// A triangle for collision detection
///
/// The face normal follows the right-hand rule. Face contacts always push
/// shapes toward the front of the face, even from slightly behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Triangle vertices in world space
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Calculates the unit normal of the triangle (right-hand rule)
    ///
    /// Returns `None` for zero-area triangles.
    pub fn normal(&self) -> Option<Vec3> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).try_normalize(DIRECTION_EPSILON)
    }

    /// World-space bounds
    pub fn bounds(&self) -> AABB {
        AABB::new(
            self.v0.inf(&self.v1).inf(&self.v2),
            self.v0.sup(&self.v1).sup(&self.v2),
        )
    }

    /// The three edges as segment endpoints
    pub fn edges(&self) -> [(Vec3, Vec3); 3] {
        [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
    }

    /// Check whether a point lying in the triangle's plane is inside it
    pub fn contains_point(&self, point: Vec3) -> bool {
        let e0 = self.v1 - self.v0;
        let e1 = self.v2 - self.v0;
        let p = point - self.v0;

        let d00 = e0.dot(&e0);
        let d01 = e0.dot(&e1);
        let d11 = e1.dot(&e1);
        let d20 = p.dot(&e0);
        let d21 = p.dot(&e1);

        let denom = d00 * d11 - d01 * d01;
        if denom.abs() <= f32::EPSILON {
            return false;
        }

        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        v >= 0.0 && w >= 0.0 && v + w <= 1.0
    }

    /// Test a sphere against this triangle
    ///
    /// The face is tried first; if the projected center falls outside it the
    /// three edges are tested.
    pub fn intersect_sphere(&self, sphere: &BoundingSphere) -> Option<Contact> {
        let normal = self.normal()?;
        let distance = normal.dot(&(sphere.center - self.v0));
        if distance.abs() > sphere.radius {
            return None;
        }

        let projected = sphere.center - normal * distance;
        if self.contains_point(projected) {
            return Some(Contact::new(normal, (distance - sphere.radius).abs()));
        }

        let radius_sq = sphere.radius * sphere.radius;
        for (a, b) in self.edges() {
            let closest = closest_point_on_segment(a, b, sphere.center);
            let offset = sphere.center - closest;
            let distance_sq = offset.magnitude_squared();
            if distance_sq < radius_sq {
                let edge_normal = offset.try_normalize(DIRECTION_EPSILON).unwrap_or(normal);
                return Some(Contact::new(edge_normal, sphere.radius - distance_sq.sqrt()));
            }
        }

        None
    }

    /// Test a capsule against this triangle
    ///
    /// Finds where the capsule segment, inflated by its radius, crosses the
    /// triangle plane; if that point is on the face the contact uses the face
    /// normal. Otherwise the capsule segment is tested against each edge.
    pub fn intersect_capsule(&self, capsule: &Capsule) -> Option<Contact> {
        let normal = self.normal()?;
        let radius = capsule.radius;

        let d1 = normal.dot(&(capsule.start - self.v0)) - radius;
        let d2 = normal.dot(&(capsule.end - self.v0)) - radius;

        if (d1 > 0.0 && d2 > 0.0) || (d1 < -radius && d2 < -radius) {
            return None;
        }

        let span = d1.abs() + d2.abs();
        let delta = if span > f32::EPSILON { (d1 / span).abs() } else { 0.0 };
        let crossing = utils::lerp_vec(capsule.start, capsule.end, delta);
        if self.contains_point(crossing - normal * normal.dot(&(crossing - self.v0))) {
            return Some(Contact::new(normal, d1.min(d2).abs()));
        }

        let radius_sq = radius * radius;
        for (a, b) in self.edges() {
            let (on_capsule, on_edge) = closest_points_between_segments(capsule.start, capsule.end, a, b);
            let offset = on_capsule - on_edge;
            let distance_sq = offset.magnitude_squared();
            if distance_sq < radius_sq {
                let edge_normal = offset.try_normalize(DIRECTION_EPSILON).unwrap_or(normal);
                return Some(Contact::new(edge_normal, radius - distance_sq.sqrt()));
            }
        }

        None
    }
}

/// Closest point to `point` on the segment `a..b`
pub fn closest_point_on_segment(a: Vec3, b: Vec3, point: Vec3) -> Vec3 {
    let ab = b - a;
    let length_sq = ab.magnitude_squared();
    if length_sq <= f32::EPSILON {
        return a;
    }
    let t = ((point - a).dot(&ab) / length_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Closest points between segments `p1..q1` and `p2..q2`
///
/// Returns `(point on first segment, point on second segment)`.
pub fn closest_points_between_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.dot(&d1);
    let e = d2.dot(&d2);
    let f = d2.dot(&r);

    if a <= f32::EPSILON && e <= f32::EPSILON {
        return (p1, p2);
    }

    let (s, t) = if a <= f32::EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= f32::EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;
            let s = if denom.abs() > f32::EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let t = (b * s + f) / e;
            if t < 0.0 {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else if t > 1.0 {
                (((b - c) / a).clamp(0.0, 1.0), 1.0)
            } else {
                (s, t)
            }
        }
    };

    (p1 + d1 * s, p2 + d2 * t)
}
