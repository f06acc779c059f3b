//! World collider interface
//!
//! The static level is an opaque oracle: given a shape, it reports the
//! contact that pushes the shape out of the level, if any. "No contact" is an
//! ordinary answer, not an error.

use super::collision::{BoundingSphere, Capsule, Contact};

/// Read-only query interface over static level geometry
pub trait WorldCollider: Send + Sync {
    /// Nearest penetrating contact for the player capsule
    fn query_capsule(&self, capsule: &Capsule) -> Option<Contact>;

    /// Nearest penetrating contact for a sphere
    fn query_sphere(&self, sphere: &BoundingSphere) -> Option<Contact>;
}

/// A world with no geometry; every query misses
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyWorld;

impl WorldCollider for EmptyWorld {
    fn query_capsule(&self, _capsule: &Capsule) -> Option<Contact> {
        None
    }

    fn query_sphere(&self, _sphere: &BoundingSphere) -> Option<Contact> {
        None
    }
}
