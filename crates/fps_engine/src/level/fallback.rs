//! Generated fallback level
//!
//! Used when no level mesh is available: a flat ground slab plus a seeded
//! scatter of rotated boxes. The same seed always produces the same level.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::WorldConfig;
use crate::foundation::math::{constants::PI, Rot3, Vec3};
use crate::physics::collision::Triangle;
use crate::spatial::TriangleOctree;

use super::box_triangles;

/// Triangles of the fallback level: the ground slab first, then each box
pub fn fallback_world(config: &WorldConfig) -> Vec<Triangle> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut triangles = Vec::with_capacity(12 * (config.box_count + 1));

    triangles.extend(box_triangles(
        config.ground_center,
        config.ground_size * 0.5,
        &Rot3::identity(),
    ));

    let half_spread = config.spread * 0.5;
    let half_box = Vec3::repeat(config.box_size * 0.5);

    for _ in 0..config.box_count {
        let center = Vec3::new(
            rng.gen_range(-half_spread..=half_spread),
            rng.gen_range(config.min_height..=config.max_height),
            rng.gen_range(-half_spread..=half_spread),
        );

        // X then Y then Z, each in [0, pi)
        let rotation = Rot3::from_axis_angle(&Vec3::x_axis(), rng.gen_range(0.0..PI))
            * Rot3::from_axis_angle(&Vec3::y_axis(), rng.gen_range(0.0..PI))
            * Rot3::from_axis_angle(&Vec3::z_axis(), rng.gen_range(0.0..PI));

        triangles.extend(box_triangles(center, half_box, &rotation));
    }

    triangles
}

/// Build the fallback level and index it for collision queries
pub fn build_fallback_octree(config: &WorldConfig) -> TriangleOctree {
    log::info!(
        "Generating fallback level: {} boxes, seed {:#x}",
        config.box_count,
        config.seed
    );
    TriangleOctree::from_triangles(fallback_world(config), config.octree.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::BoundingSphere;
    use crate::physics::world::WorldCollider;
    use approx::assert_relative_eq;

    #[test]
    fn test_fallback_world_is_deterministic() {
        let config = WorldConfig::default();
        let a = fallback_world(&config);
        let b = fallback_world(&config);
        assert_eq!(a.len(), 12 * 41);
        assert_eq!(a, b);

        let other = fallback_world(&WorldConfig { seed: 7, ..WorldConfig::default() });
        assert_ne!(a, other);
    }

    #[test]
    fn test_boxes_stay_within_spread() {
        let config = WorldConfig::default();
        // Rotated cube corners reach at most half the cube diagonal from the center
        let reach = config.spread * 0.5 + config.box_size * 0.5 * 3f32.sqrt() + 1e-3;
        for triangle in &fallback_world(&config)[12..] {
            for v in [triangle.v0, triangle.v1, triangle.v2] {
                assert!(v.x.abs() <= reach);
                assert!(v.z.abs() <= reach);
            }
        }
    }

    #[test]
    fn test_zero_spread_and_fixed_height() {
        let config = WorldConfig {
            spread: 0.0,
            min_height: 5.0,
            max_height: 5.0,
            box_count: 3,
            ..WorldConfig::default()
        };
        let triangles = fallback_world(&config);
        assert_eq!(triangles.len(), 48);
        for chunk in triangles[12..].chunks(12) {
            let sum: Vec3 = chunk.iter().map(|t| t.v0 + t.v1 + t.v2).sum();
            // Each face contributes six times its own center
            assert_relative_eq!(sum / 36.0, Vec3::new(0.0, 5.0, 0.0), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_ground_top_is_at_origin() {
        let octree = build_fallback_octree(&WorldConfig {
            box_count: 0,
            ..WorldConfig::default()
        });
        let contact = octree
            .query_sphere(&BoundingSphere::new(Vec3::new(0.0, 0.1, 0.0), 0.2))
            .expect("sphere touches the ground");
        assert_relative_eq!(contact.normal, Vec3::y(), epsilon = 1e-5);
    }
}
