//! Contact response
//!
//! Velocity and position corrections shared by the player controller and the
//! sphere pool. Pairwise responses treat every body as an equal-mass elastic
//! body: the velocity components along the contact normal are swapped.

use super::collision::{BoundingSphere, Capsule};
use super::world::WorldCollider;
use crate::foundation::math::Vec3;

/// Penetration shallower than this is left uncorrected
pub const PENETRATION_EPSILON: f32 = 1e-10;

/// Centers closer than this (squared) have no usable normal
pub const MIN_SEPARATION_SQ: f32 = 1e-12;

/// Result of a pairwise collision test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    /// The bodies do not overlap
    Separate,
    /// The bodies overlapped and were pushed apart
    Resolved,
    /// The centers coincide; no normal exists, the pair was skipped
    Degenerate,
}

impl PairOutcome {
    /// True when the pair was pushed apart
    pub fn is_resolved(self) -> bool {
        self == Self::Resolved
    }
}

/// Overlap test for two centers: normal from `b` to `a` and center distance
enum Overlap {
    None,
    Degenerate,
    Hit { normal: Vec3, distance: f32 },
}

fn overlap(a: Vec3, b: Vec3, combined_radius: f32) -> Overlap {
    let offset = a - b;
    let distance_sq = offset.magnitude_squared();

    if distance_sq >= combined_radius * combined_radius {
        return Overlap::None;
    }
    if !distance_sq.is_finite() || distance_sq < MIN_SEPARATION_SQ {
        return Overlap::Degenerate;
    }

    let distance = distance_sq.sqrt();
    Overlap::Hit {
        normal: offset / distance,
        distance,
    }
}

/// Swap the components of two velocities along `normal`
pub fn exchange_normal_velocity(normal: Vec3, va: &mut Vec3, vb: &mut Vec3) {
    let a_along = normal * normal.dot(va);
    let b_along = normal * normal.dot(vb);
    *va += b_along - a_along;
    *vb += a_along - b_along;
}

/// Resolve the player capsule against the world
///
/// Returns whether the player is standing on a walkable surface. Against
/// walls and ceilings only the velocity component heading into the surface is
/// removed, so the player keeps sliding along it.
pub fn resolve_capsule_world(
    world: &dyn WorldCollider,
    capsule: &mut Capsule,
    velocity: &mut Vec3,
) -> bool {
    let Some(contact) = world.query_capsule(capsule) else {
        return false;
    };

    let on_floor = contact.normal.y > 0.0;

    if !on_floor {
        let approach = contact.normal.dot(velocity);
        if approach < 0.0 {
            *velocity -= contact.normal * approach;
        }
    }

    if contact.depth >= PENETRATION_EPSILON {
        capsule.translate(contact.correction());
    }

    on_floor
}

/// Resolve a sphere against the world
///
/// On contact the normal velocity is reflected scaled by `restitution`
/// (1.0 cancels it, 2.0 mirrors it) and the sphere is pushed out by the full
/// depth. Returns whether there was a contact.
pub fn resolve_sphere_world(
    world: &dyn WorldCollider,
    sphere: &mut BoundingSphere,
    velocity: &mut Vec3,
    restitution: f32,
) -> bool {
    let Some(contact) = world.query_sphere(sphere) else {
        return false;
    };

    *velocity -= contact.normal * (contact.normal.dot(velocity) * restitution);
    sphere.center += contact.correction();
    true
}

/// Resolve two overlapping spheres
///
/// Velocities along the center line are swapped and each sphere moves half
/// the overlap away from the other.
pub fn resolve_sphere_pair(
    a: &mut BoundingSphere,
    va: &mut Vec3,
    b: &mut BoundingSphere,
    vb: &mut Vec3,
) -> PairOutcome {
    let combined = a.radius + b.radius;
    match overlap(a.center, b.center, combined) {
        Overlap::None => PairOutcome::Separate,
        Overlap::Degenerate => PairOutcome::Degenerate,
        Overlap::Hit { normal, distance } => {
            exchange_normal_velocity(normal, va, vb);

            let push = (combined - distance) * 0.5;
            a.center += normal * push;
            b.center -= normal * push;
            PairOutcome::Resolved
        }
    }
}

/// Resolve a sphere against a fixed sample point of radius `point_radius`
///
/// The point exchanges velocity with the sphere but is not moved; the sphere
/// takes the whole overlap.
pub fn resolve_point_sphere(
    point: Vec3,
    point_radius: f32,
    point_velocity: &mut Vec3,
    sphere: &mut BoundingSphere,
    sphere_velocity: &mut Vec3,
) -> PairOutcome {
    let combined = point_radius + sphere.radius;
    match overlap(point, sphere.center, combined) {
        Overlap::None => PairOutcome::Separate,
        Overlap::Degenerate => PairOutcome::Degenerate,
        Overlap::Hit { normal, distance } => {
            exchange_normal_velocity(normal, point_velocity, sphere_velocity);
            sphere.center -= normal * (combined - distance);
            PairOutcome::Resolved
        }
    }
}

/// Resolve a sphere against the player, approximated by the capsule's three
/// sample points
///
/// Each sample point is an independent pass, so a sphere near several points
/// is deflected several times in one call. Returns how many points hit.
pub fn resolve_capsule_sphere(
    capsule: &Capsule,
    player_velocity: &mut Vec3,
    sphere: &mut BoundingSphere,
    sphere_velocity: &mut Vec3,
) -> usize {
    capsule
        .sample_points()
        .into_iter()
        .filter(|&point| {
            resolve_point_sphere(point, capsule.radius, player_velocity, sphere, sphere_velocity)
                .is_resolved()
        })
        .count()
}
