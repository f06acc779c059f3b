//! Collision geometry
//!
//! # Key Types
//!
//! - [`Capsule`] - The player's collision volume (segment + radius)
//! - [`BoundingSphere`] - Projectile collider
//! - [`Triangle`] - Static level geometry, with narrow-phase tests against both shapes
//! - [`Contact`] - Transient result of a world query (unit normal + depth)

pub mod primitives;

// Re-export commonly used types
pub use primitives::{
    closest_point_on_segment,
    closest_points_between_segments,
    BoundingSphere,
    Capsule,
    Contact,
    Triangle,
};
