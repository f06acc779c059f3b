//! # View Interfaces
//!
//! The physics core never owns a camera or a scene. It reads the look
//! direction through [`ViewDirection`] and pushes results out through
//! [`RenderSink`] once per frame.
//!
//! [`FirstPersonCamera`] is the stock implementation of both: yaw/pitch mouse
//! look applied in YXZ order, looking down -Z at rest.

use crate::foundation::math::{constants::HALF_PI, Vec3};

/// Source of the player's look direction
pub trait ViewDirection {
    /// Unit vector the player is looking along
    fn forward(&self) -> Vec3;
}

/// Receiver of per-frame simulation output
pub trait RenderSink {
    /// Eye position of the player (the capsule's top sphere center)
    fn sync_player(&mut self, eye: Vec3);

    /// Center of the sphere at `index` in the pool
    fn sync_sphere(&mut self, _index: usize, _center: Vec3) {}

    /// The player fell out of the world and was respawned this frame
    fn on_player_reset(&mut self) {}
}

/// Mouse deltas are divided by this to get radians
const LOOK_SENSITIVITY: f32 = 500.0;

/// Pitch stops just short of straight up or down
const PITCH_LIMIT: f32 = HALF_PI - 1e-3;

/// First-person camera driven by mouse look
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FirstPersonCamera {
    /// Rotation about the world Y axis, radians
    pub yaw: f32,
    /// Rotation about the camera X axis, radians
    pub pitch: f32,
    /// World-space eye position
    pub position: Vec3,
}

impl FirstPersonCamera {
    /// Camera at the origin looking down -Z
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a mouse movement in pixels
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx / LOOK_SENSITIVITY;
        self.pitch = (self.pitch - dy / LOOK_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Zero the rotation
    pub fn reset(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
    }
}

impl ViewDirection for FirstPersonCamera {
    fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }
}

impl RenderSink for FirstPersonCamera {
    fn sync_player(&mut self, eye: Vec3) {
        self.position = eye;
    }

    fn on_player_reset(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use approx::assert_relative_eq;

    #[test]
    fn test_rest_looks_down_negative_z() {
        let camera = FirstPersonCamera::new();
        assert_relative_eq!(camera.forward(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_mouse_right_turns_right() {
        let mut camera = FirstPersonCamera::new();
        camera.look(LOOK_SENSITIVITY * PI * 0.5, 0.0);
        assert_relative_eq!(camera.forward(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_mouse_up_looks_up_and_clamps() {
        let mut camera = FirstPersonCamera::new();
        camera.look(0.0, -100.0);
        assert!(camera.forward().y > 0.0);
        assert_relative_eq!(camera.forward().magnitude(), 1.0, epsilon = 1e-6);

        camera.look(0.0, -1.0e6);
        assert_relative_eq!(camera.pitch, PITCH_LIMIT);
    }

    #[test]
    fn test_reset_on_respawn() {
        let mut camera = FirstPersonCamera::new();
        camera.look(123.0, 45.0);
        camera.sync_player(Vec3::new(1.0, 2.0, 3.0));
        camera.on_player_reset();

        assert_eq!(camera.yaw, 0.0);
        assert_eq!(camera.pitch, 0.0);
        assert_eq!(camera.position, Vec3::new(1.0, 2.0, 3.0));
    }
}
