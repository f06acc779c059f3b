//! # FPS Engine
//!
//! Physics core for a first-person sandbox: a capsule player that walks,
//! jumps and collides with static level geometry, and a pool of throwable
//! spheres that bounce off the level, each other and the player.
//!
//! ## Features
//!
//! - **Capsule Controller**: ground and air control, jump, gravity, damping
//! - **Sphere Pool**: round-robin throws with charged launch speed
//! - **Octree Level Collider**: capsule and sphere queries against triangle soup
//! - **Fixed Substeps**: each frame clamped and split into equal substeps
//!
//! Rendering, windowing and device input stay with the host, which talks to
//! the core through [`view::ViewDirection`], [`view::RenderSink`] and
//! [`input::FrameInput`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fps_engine::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     let mut sim = Simulation::with_fallback_world(SimulationConfig::default())?;
//!     let mut camera = FirstPersonCamera::new();
//!
//!     let input = FrameInput::new(MoveIntents::FORWARD);
//!     let report = sim.advance_frame(1.0 / 60.0, &input, &camera);
//!     sim.sync_render(&report, &mut camera);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Configuration
pub mod config;
pub mod core;

pub mod foundation;
pub mod input;
pub mod level;
pub mod physics;
pub mod player;
pub mod projectiles;
pub mod simulation;
pub mod spatial;
pub mod view;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::{Config, ConfigError, SimulationConfig},
        foundation::{math::Vec3, time::{FrameClock, Stopwatch}},
        input::{FrameInput, InputState, MoveIntents},
        physics::{EmptyWorld, WorldCollider},
        simulation::{FrameReport, Simulation, SimulationError},
        spatial::TriangleOctree,
        view::{FirstPersonCamera, RenderSink, ViewDirection},
    };
}
