//! Math utilities and types
//!
//! Provides the fundamental value types used by the physics core. Everything
//! is passed by value; there are no shared scratch vectors.

pub use nalgebra::{Rotation3, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Rotation type used for placing static geometry
pub type Rot3 = Rotation3<f32>;

/// World up axis (Y-up, matching the camera convention)
pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;
}

/// Math utility functions
pub mod utils {
    use super::Vec3;

    /// Linear interpolation between two points
    pub fn lerp_vec(a: Vec3, b: Vec3, t: f32) -> Vec3 {
        a + (b - a) * t
    }

    /// Normalize, or return `None` when the vector is too short to have a direction
    pub fn try_normalize(v: Vec3, min_length: f32) -> Option<Vec3> {
        v.try_normalize(min_length)
    }

    /// Drop the vertical component and renormalize.
    ///
    /// Returns the zero vector when the input points straight up or down.
    pub fn flatten_horizontal(v: Vec3) -> Vec3 {
        Vec3::new(v.x, 0.0, v.z)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros)
    }

    /// Returns true when every component is finite
    pub fn is_finite(v: &Vec3) -> bool {
        v.iter().all(|c| c.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::utils::*;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flatten_horizontal_removes_pitch() {
        let forward = Vec3::new(0.0, 0.5, -0.5).normalize();
        assert_relative_eq!(flatten_horizontal(forward), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_flatten_horizontal_vertical_is_zero() {
        assert_eq!(flatten_horizontal(UP), Vec3::zeros());
    }

    #[test]
    fn test_lerp_vec_midpoint() {
        let mid = lerp_vec(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 4.0, 6.0), 0.5);
        assert_relative_eq!(mid, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_try_normalize_rejects_zero() {
        assert!(try_normalize(Vec3::zeros(), 1e-6).is_none());
        assert!(is_finite(&Vec3::new(1.0, 2.0, 3.0)));
        assert!(!is_finite(&Vec3::new(f32::NAN, 0.0, 0.0)));
    }
}
