//! # Player Controller
//!
//! Kinematic capsule controller: walk, air control, jump, gravity and
//! exponential damping, resolved against the static world every substep.
//!
//! The capsule keeps its shape for its whole life. It is only ever translated
//! (by movement and contact push-out) or put back at the spawn pose.

use crate::core::PlayerConfig;
use crate::foundation::math::{utils, Vec3, UP};
use crate::input::MoveIntents;
use crate::physics::response::{resolve_capsule_sphere, resolve_capsule_world};
use crate::physics::{BoundingSphere, Capsule, WorldCollider};
use crate::view::ViewDirection;

/// Capsule-based first-person player
#[derive(Debug, Clone)]
pub struct PlayerController {
    collider: Capsule,
    velocity: Vec3,
    on_floor: bool,
    gravity: f32,
    config: PlayerConfig,
}

impl PlayerController {
    /// Create a player at the configured spawn pose
    pub fn new(config: PlayerConfig, gravity: f32) -> Self {
        Self {
            collider: spawn_capsule(&config),
            velocity: Vec3::zeros(),
            on_floor: false,
            gravity,
            config,
        }
    }

    /// Add this substep's movement input to the velocity
    ///
    /// Walking follows the view direction flattened onto the ground, so looking
    /// up or down does not change walking speed. Jumping only works while
    /// standing and replaces the vertical velocity.
    pub fn apply_controls(&mut self, elapsed: f32, intents: MoveIntents, view: &dyn ViewDirection) {
        let acceleration = if self.on_floor {
            self.config.ground_acceleration
        } else {
            self.config.air_acceleration
        };
        let speed_delta = elapsed * acceleration;

        let forward = utils::flatten_horizontal(view.forward());
        let side = forward.cross(&UP);

        if intents.contains(MoveIntents::FORWARD) {
            self.velocity += forward * speed_delta;
        }
        if intents.contains(MoveIntents::BACKWARD) {
            self.velocity -= forward * speed_delta;
        }
        if intents.contains(MoveIntents::LEFT) {
            self.velocity -= side * speed_delta;
        }
        if intents.contains(MoveIntents::RIGHT) {
            self.velocity += side * speed_delta;
        }

        if self.on_floor && intents.wants_jump() {
            self.velocity.y = self.config.jump_speed;
        }
    }

    /// Apply gravity and damping, move, then resolve against the world
    pub fn integrate(&mut self, elapsed: f32, world: &dyn WorldCollider) {
        let mut damping = (-self.config.damping * elapsed).exp() - 1.0;

        if !self.on_floor {
            self.velocity.y -= self.gravity * elapsed;
            // Air resistance is much weaker than ground friction
            damping *= self.config.air_damping_factor;
        }

        self.velocity += self.velocity * damping;
        self.collider.translate(self.velocity * elapsed);

        self.on_floor = resolve_capsule_world(world, &mut self.collider, &mut self.velocity);
    }

    /// Respawn when the eye has dropped to `threshold` or below
    ///
    /// Returns whether the player was reset. Calling again above the
    /// threshold changes nothing.
    pub fn reset_if_fallen(&mut self, threshold: f32) -> bool {
        if self.collider.end.y > threshold {
            return false;
        }

        log::info!(
            "Player fell out of the world (eye at y = {:.2}); respawning",
            self.collider.end.y
        );
        self.reset();
        true
    }

    /// Put the player back at the spawn pose, at rest and airborne
    pub fn reset(&mut self) {
        self.collider = spawn_capsule(&self.config);
        self.velocity = Vec3::zeros();
        self.on_floor = false;
    }

    /// Deflect a sphere off the player's sample points
    ///
    /// Returns how many of the three sample points were hit.
    pub fn deflect_sphere(&mut self, sphere: &mut BoundingSphere, sphere_velocity: &mut Vec3) -> usize {
        resolve_capsule_sphere(&self.collider, &mut self.velocity, sphere, sphere_velocity)
    }

    /// Move the player without touching its velocity
    pub fn translate(&mut self, delta: Vec3) {
        self.collider.translate(delta);
    }

    /// Replace the player's velocity
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// The player's capsule
    pub fn collider(&self) -> &Capsule {
        &self.collider
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Whether the last world contact was walkable
    pub fn on_floor(&self) -> bool {
        self.on_floor
    }

    /// Camera position: the top sphere center
    pub fn eye_position(&self) -> Vec3 {
        self.collider.end
    }
}

fn spawn_capsule(config: &PlayerConfig) -> Capsule {
    Capsule::new(config.spawn_start, config.spawn_end, config.radius)
}
