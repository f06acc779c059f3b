//! # Fixed-Substep Simulation
//!
//! Owns the player, the sphere pool and the world collider, and advances them
//! together. Each rendered frame is clamped to a maximum delta and split into
//! a fixed number of equal substeps. Within a substep the order is fixed:
//!
//! 1. player controls
//! 2. player integration and world resolution
//! 3. every sphere against the world and the player, then all sphere pairs
//! 4. out-of-bounds check
//!
//! Results reach the host through [`Simulation::sync_render`] once per frame.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::core::{Config, ConfigError, SimulationConfig};
use crate::foundation::math::Vec3;
use crate::input::FrameInput;
use crate::level::build_fallback_octree;
use crate::physics::WorldCollider;
use crate::player::PlayerController;
use crate::projectiles::SpherePool;
use crate::view::{RenderSink, ViewDirection};

#[cfg(test)]
mod tests;

/// Simulation construction errors
#[derive(Error, Debug)]
pub enum SimulationError {
    /// A configuration value is out of range
    #[error("Invalid simulation configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// What happened during one [`Simulation::advance_frame`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Substeps run
    pub substeps: u32,
    /// Length of each substep in seconds
    pub substep_delta: f32,
    /// Slot of the sphere fired this frame
    pub fired: Option<usize>,
    /// The player fell out of the world and was respawned
    pub player_reset: bool,
    /// The player ended the frame on a walkable surface
    pub player_on_floor: bool,
}

/// The physics core: player, spheres and static world
pub struct Simulation {
    config: SimulationConfig,
    world: Box<dyn WorldCollider>,
    player: PlayerController,
    spheres: SpherePool,
}

impl Simulation {
    /// Build a simulation over an existing world collider
    ///
    /// The configuration is validated here and fixed from then on.
    pub fn new(config: SimulationConfig, world: Box<dyn WorldCollider>) -> Result<Self, SimulationError> {
        config.validate().map_err(SimulationError::InvalidConfig)?;

        let player = PlayerController::new(config.player.clone(), config.gravity);
        let spheres = SpherePool::new(config.spheres.clone(), config.gravity);

        log::info!(
            "Simulation ready: {} spheres, {} substeps per frame, max frame delta {}s",
            spheres.len(),
            config.stepping.substeps,
            config.stepping.max_frame_delta
        );

        Ok(Self {
            config,
            world,
            player,
            spheres,
        })
    }

    /// Build a simulation over the generated fallback level
    pub fn with_fallback_world(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate().map_err(SimulationError::InvalidConfig)?;
        let world = build_fallback_octree(&config.world);
        Self::new(config, Box::new(world))
    }

    /// Load a `.toml` or `.ron` configuration and build over the fallback level
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        log::info!("Loading simulation config from {}", path.display());
        let config = SimulationConfig::load_from_file(path)?;
        Self::with_fallback_world(config)
    }

    /// Length of one substep for a frame of `frame_delta` seconds
    ///
    /// Frames longer than the configured maximum are clamped. Negative and
    /// non-finite deltas integrate nothing.
    pub fn substep_delta(&self, frame_delta: f32) -> f32 {
        let stepping = &self.config.stepping;

        let clamped = if frame_delta.is_finite() {
            if frame_delta > stepping.max_frame_delta {
                log::trace!(
                    "Clamping frame delta {:.4}s to {:.4}s",
                    frame_delta,
                    stepping.max_frame_delta
                );
            }
            frame_delta.clamp(0.0, stepping.max_frame_delta)
        } else {
            log::warn!("Ignoring non-finite frame delta {}", frame_delta);
            0.0
        };

        clamped / stepping.substeps as f32
    }

    /// Throw a sphere from the player's eye along `direction`
    ///
    /// Returns the pool slot used.
    pub fn fire(&mut self, direction: Vec3, charge: Duration) -> usize {
        self.spheres.fire(
            self.player.collider(),
            direction,
            self.player.velocity(),
            charge,
        )
    }

    /// Advance one rendered frame
    ///
    /// A fire request in `input` is handled before the first substep, along
    /// the current view direction.
    pub fn advance_frame(
        &mut self,
        frame_delta: f32,
        input: &FrameInput,
        view: &dyn ViewDirection,
    ) -> FrameReport {
        let fired = input.fire.map(|charge| self.fire(view.forward(), charge));

        let substeps = self.config.stepping.substeps;
        let dt = self.substep_delta(frame_delta);
        let mut player_reset = false;

        for _ in 0..substeps {
            self.player.apply_controls(dt, input.intents, view);
            self.player.integrate(dt, self.world.as_ref());
            self.spheres.step(dt, self.world.as_ref(), &mut self.player);
            player_reset |= self.player.reset_if_fallen(self.config.player.fall_threshold);
        }

        FrameReport {
            substeps,
            substep_delta: dt,
            fired,
            player_reset,
            player_on_floor: self.player.on_floor(),
        }
    }

    /// Push the frame's results to the renderer
    pub fn sync_render(&self, report: &FrameReport, sink: &mut dyn RenderSink) {
        if report.player_reset {
            sink.on_player_reset();
        }
        sink.sync_player(self.player.eye_position());
        for (index, center) in self.spheres.centers().enumerate() {
            sink.sync_sphere(index, center);
        }
    }

    /// The player controller
    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    /// Mutable access to the player controller
    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    /// The sphere pool
    pub fn spheres(&self) -> &SpherePool {
        &self.spheres
    }

    /// The configuration the simulation was built with
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The static world
    pub fn world(&self) -> &dyn WorldCollider {
        self.world.as_ref()
    }
}
