//! Physics module for collision detection and response
//!
//! Shapes and narrow-phase tests live in [`collision`], the world query
//! interface in [`world`], and the contact response routines shared by the
//! player controller and the sphere pool in [`response`].

pub mod collision;
pub mod response;
pub mod world;

pub use collision::{BoundingSphere, Capsule, Contact, Triangle};
pub use response::PairOutcome;
pub use world::{EmptyWorld, WorldCollider};
