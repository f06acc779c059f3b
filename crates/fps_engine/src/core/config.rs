//! # Simulation Configuration
//!
//! All tuning constants of the physics core live here. They are fixed once a
//! [`Simulation`](crate::simulation::Simulation) has been built; changing them
//! means building a new simulation.
//!
//! ## Configuration Categories
//!
//! - **Player Config**: capsule pose, movement speeds, jump, damping, fall threshold
//! - **Sphere Config**: projectile pool size, radius, launch and bounce tuning
//! - **Step Config**: substep count and frame delta clamp
//! - **World Config**: parameters of the generated fallback level

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::foundation::math::{utils, Vec3};
use crate::spatial::OctreeConfig;

/// # Player Configuration
///
/// Spawn pose and movement tuning for the capsule controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Bottom sphere center of the capsule at spawn
    pub spawn_start: Vec3,
    /// Top sphere center of the capsule at spawn (the eye position)
    pub spawn_end: Vec3,
    /// Capsule radius
    pub radius: f32,
    /// Horizontal acceleration while standing on a walkable surface
    pub ground_acceleration: f32,
    /// Horizontal acceleration while airborne
    pub air_acceleration: f32,
    /// Vertical speed set when jumping
    pub jump_speed: f32,
    /// Exponential damping coefficient
    pub damping: f32,
    /// Damping multiplier while airborne
    pub air_damping_factor: f32,
    /// Eye height at or below which the player is respawned
    pub fall_threshold: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn_start: Vec3::new(0.0, 0.35, 0.0),
            spawn_end: Vec3::new(0.0, 1.0, 0.0),
            radius: 0.35,
            ground_acceleration: 25.0,
            air_acceleration: 8.0,
            jump_speed: 15.0,
            damping: 4.0,
            air_damping_factor: 0.1,
            fall_threshold: -25.0,
        }
    }
}

impl PlayerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        positive("player.radius", self.radius)?;
        non_negative("player.ground_acceleration", self.ground_acceleration)?;
        non_negative("player.air_acceleration", self.air_acceleration)?;
        non_negative("player.jump_speed", self.jump_speed)?;
        non_negative("player.damping", self.damping)?;
        non_negative("player.air_damping_factor", self.air_damping_factor)?;
        finite("player.fall_threshold", self.fall_threshold)?;

        if !(utils::is_finite(&self.spawn_start) && utils::is_finite(&self.spawn_end)) {
            return Err("player spawn pose must be finite".to_string());
        }
        if self.spawn_end.y <= self.fall_threshold {
            return Err(format!(
                "player spawn eye height {} is already below the fall threshold {}",
                self.spawn_end.y, self.fall_threshold
            ));
        }

        Ok(())
    }
}

/// # Sphere Configuration
///
/// Tuning for the pooled projectile spheres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    /// Number of pooled spheres
    pub count: usize,
    /// Radius of every sphere
    pub radius: f32,
    /// Where unused spheres wait
    pub parked_position: Vec3,
    /// Spawn distance in front of the eye, as a multiple of the player radius
    pub spawn_offset: f32,
    /// Launch speed of an instant tap
    pub base_impulse: f32,
    /// Extra launch speed approached as the trigger is held
    pub charge_impulse: f32,
    /// Charge rate per second of hold time
    pub charge_rate: f32,
    /// Weight of the player's velocity added to a launched sphere
    pub momentum_inheritance: f32,
    /// Bounce factor against world geometry (1.0 stops, 2.0 mirrors)
    pub restitution: f32,
    /// Exponential damping coefficient
    pub damping: f32,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            count: 40,
            radius: 0.2,
            parked_position: Vec3::new(0.0, -100.0, 0.0),
            spawn_offset: 1.5,
            base_impulse: 15.0,
            charge_impulse: 30.0,
            charge_rate: 1.0,
            momentum_inheritance: 2.0,
            restitution: 1.5,
            damping: 1.5,
        }
    }
}

impl SphereConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.count == 0 {
            return Err("spheres.count must be at least 1".to_string());
        }
        positive("spheres.radius", self.radius)?;
        non_negative("spheres.spawn_offset", self.spawn_offset)?;
        non_negative("spheres.base_impulse", self.base_impulse)?;
        non_negative("spheres.charge_impulse", self.charge_impulse)?;
        positive("spheres.charge_rate", self.charge_rate)?;
        finite("spheres.momentum_inheritance", self.momentum_inheritance)?;
        non_negative("spheres.restitution", self.restitution)?;
        non_negative("spheres.damping", self.damping)?;

        if !utils::is_finite(&self.parked_position) {
            return Err("spheres.parked_position must be finite".to_string());
        }

        Ok(())
    }
}

/// # Step Configuration
///
/// Fixed-substep integrator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Substeps run per rendered frame
    pub substeps: u32,
    /// Largest frame delta integrated, in seconds
    pub max_frame_delta: f32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            substeps: 3,
            max_frame_delta: 0.05,
        }
    }
}

impl StepConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.substeps == 0 {
            return Err("stepping.substeps must be at least 1".to_string());
        }
        positive("stepping.max_frame_delta", self.max_frame_delta)
    }
}

/// # World Configuration
///
/// Parameters of the generated fallback level: a ground slab plus randomly
/// placed and rotated boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for box placement
    pub seed: u64,
    /// Full size of the ground slab
    pub ground_size: Vec3,
    /// Center of the ground slab
    pub ground_center: Vec3,
    /// Number of scattered boxes
    pub box_count: usize,
    /// Edge length of each scattered box
    pub box_size: f32,
    /// Boxes are placed in `[-spread/2, spread/2]` on X and Z
    pub spread: f32,
    /// Lowest box center height
    pub min_height: f32,
    /// Highest box center height
    pub max_height: f32,
    /// Spatial partitioning of the level triangles
    pub octree: OctreeConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            ground_size: Vec3::new(60.0, 2.0, 60.0),
            ground_center: Vec3::new(0.0, -1.0, 0.0),
            box_count: 40,
            box_size: 4.0,
            spread: 50.0,
            min_height: 1.0,
            max_height: 10.0,
            octree: OctreeConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.ground_size.iter().any(|c| !c.is_finite() || *c <= 0.0) {
            return Err("world.ground_size must be positive on every axis".to_string());
        }
        if !utils::is_finite(&self.ground_center) {
            return Err("world.ground_center must be finite".to_string());
        }
        positive("world.box_size", self.box_size)?;
        non_negative("world.spread", self.spread)?;
        finite("world.min_height", self.min_height)?;
        finite("world.max_height", self.max_height)?;
        if self.min_height > self.max_height {
            return Err(format!(
                "world.min_height {} exceeds world.max_height {}",
                self.min_height, self.max_height
            ));
        }
        self.octree.validate()
    }
}

/// # Simulation Configuration
///
/// Top-level configuration of the physics core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Downward acceleration applied to airborne bodies
    pub gravity: f32,
    /// Player controller settings
    pub player: PlayerConfig,
    /// Projectile pool settings
    pub spheres: SphereConfig,
    /// Integrator settings
    pub stepping: StepConfig,
    /// Fallback level settings
    pub world: WorldConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: 30.0,
            player: PlayerConfig::default(),
            spheres: SphereConfig::default(),
            stepping: StepConfig::default(),
            world: WorldConfig::default(),
        }
    }
}

impl Config for SimulationConfig {}

impl SimulationConfig {
    /// Set gravity
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the projectile pool size
    pub fn with_sphere_count(mut self, count: usize) -> Self {
        self.spheres.count = count;
        self
    }

    /// Set the substep count
    pub fn with_substeps(mut self, substeps: u32) -> Self {
        self.stepping.substeps = substeps;
        self
    }

    /// Set the fallback world seed
    pub fn with_world_seed(mut self, seed: u64) -> Self {
        self.world.seed = seed;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        non_negative("gravity", self.gravity)?;
        self.player.validate()?;
        self.spheres.validate()?;
        self.stepping.validate()?;
        self.world.validate()
    }
}

fn finite(name: &str, value: f32) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("{name} must be finite, got {value}"))
    }
}

fn positive(name: &str, value: f32) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{name} must be positive, got {value}"))
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{name} must be non-negative, got {value}"))
    }
}
