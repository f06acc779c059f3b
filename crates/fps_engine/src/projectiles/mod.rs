//! # Sphere Pool
//!
//! A fixed pool of throwable spheres. Every body exists from construction,
//! parked out of sight with zero velocity; `fire` takes the next slot
//! round-robin, so once the pool wraps the oldest sphere is recycled.
//!
//! Parked bodies are simulated like any other. They all share one position,
//! so their pairwise tests are skipped as degenerate.

use std::time::Duration;

use crate::core::SphereConfig;
use crate::foundation::math::{utils, Vec3};
use crate::physics::response::{resolve_sphere_pair, resolve_sphere_world};
use crate::physics::{BoundingSphere, Capsule, PairOutcome, WorldCollider};
use crate::player::PlayerController;

/// A pooled sphere; its index in the pool is its render handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereBody {
    /// Position and size
    pub collider: BoundingSphere,
    /// Linear velocity
    pub velocity: Vec3,
}

/// Round-robin pool of sphere bodies
#[derive(Debug, Clone)]
pub struct SpherePool {
    bodies: Vec<SphereBody>,
    next: usize,
    gravity: f32,
    config: SphereConfig,
}

impl SpherePool {
    /// Allocate every body, parked and at rest
    pub fn new(config: SphereConfig, gravity: f32) -> Self {
        let parked = SphereBody {
            collider: BoundingSphere::new(config.parked_position, config.radius),
            velocity: Vec3::zeros(),
        };

        Self {
            bodies: vec![parked; config.count],
            next: 0,
            gravity,
            config,
        }
    }

    /// Launch speed for a trigger held for `charge`
    ///
    /// Starts at the base impulse and approaches base + charge impulse as the
    /// hold time grows.
    pub fn launch_impulse(&self, charge: Duration) -> f32 {
        let charged = 1.0 - (-charge.as_secs_f32() * self.config.charge_rate).exp();
        self.config.base_impulse + self.config.charge_impulse * charged
    }

    /// Throw the next sphere from just in front of the eye
    ///
    /// Returns the slot that was used.
    pub fn fire(
        &mut self,
        origin: &Capsule,
        direction: Vec3,
        player_velocity: Vec3,
        charge: Duration,
    ) -> usize {
        if self.bodies.is_empty() {
            return 0;
        }

        let slot = self.next;
        let direction = utils::try_normalize(direction, f32::EPSILON).unwrap_or_else(Vec3::zeros);
        let impulse = self.launch_impulse(charge);

        let body = &mut self.bodies[slot];
        body.collider.center = origin.end + direction * (origin.radius * self.config.spawn_offset);
        body.velocity = direction * impulse + player_velocity * self.config.momentum_inheritance;

        self.next = (slot + 1) % self.bodies.len();

        log::debug!(
            "Fired sphere {} at {:.1} m/s (charge {:?})",
            slot,
            impulse,
            charge
        );
        slot
    }

    /// Advance every body by one substep
    ///
    /// Each body moves, collides with the world (bouncing, or falling when
    /// there is no contact), is damped, and is deflected off the player.
    /// Sphere pairs are resolved once all bodies have moved.
    pub fn step(&mut self, elapsed: f32, world: &dyn WorldCollider, player: &mut PlayerController) {
        let damping = (-self.config.damping * elapsed).exp() - 1.0;

        for body in &mut self.bodies {
            body.collider.center += body.velocity * elapsed;

            let touched = resolve_sphere_world(
                world,
                &mut body.collider,
                &mut body.velocity,
                self.config.restitution,
            );
            if !touched {
                body.velocity.y -= self.gravity * elapsed;
            }

            body.velocity += body.velocity * damping;

            player.deflect_sphere(&mut body.collider, &mut body.velocity);
        }

        self.resolve_pairs();
    }

    /// Resolve every unordered pair once, in index order
    fn resolve_pairs(&mut self) -> usize {
        let mut resolved = 0;

        for j in 1..self.bodies.len() {
            let (head, tail) = self.bodies.split_at_mut(j);
            let b = &mut tail[0];
            for a in head.iter_mut() {
                let outcome = resolve_sphere_pair(
                    &mut a.collider,
                    &mut a.velocity,
                    &mut b.collider,
                    &mut b.velocity,
                );
                if outcome == PairOutcome::Resolved {
                    resolved += 1;
                }
            }
        }

        resolved
    }

    /// All bodies in slot order
    pub fn bodies(&self) -> &[SphereBody] {
        &self.bodies
    }

    /// Sphere centers in slot order, for rendering
    pub fn centers(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.bodies.iter().map(|body| body.collider.center)
    }

    /// Slot the next `fire` will use
    pub fn next_slot(&self) -> usize {
        self.next
    }

    /// Pool size
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// True for an empty pool
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerConfig;
    use crate::foundation::math::Rot3;
    use crate::level::box_triangles;
    use crate::physics::EmptyWorld;
    use crate::spatial::{OctreeConfig, TriangleOctree};
    use approx::assert_relative_eq;

    const DT: f32 = 0.05 / 3.0;

    fn pool() -> SpherePool {
        SpherePool::new(SphereConfig::default(), 30.0)
    }

    /// Player parked far from every test sphere
    fn distant_player() -> PlayerController {
        let mut player = PlayerController::new(PlayerConfig::default(), 30.0);
        player.translate(Vec3::new(500.0, 0.0, 500.0));
        player
    }

    fn eye_capsule() -> Capsule {
        Capsule::new(Vec3::new(0.0, 0.35, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.35)
    }

    #[test]
    fn test_pool_starts_parked() {
        let pool = pool();
        assert_eq!(pool.len(), 40);
        assert_eq!(pool.next_slot(), 0);
        for body in pool.bodies() {
            assert_eq!(body.collider.center, Vec3::new(0.0, -100.0, 0.0));
            assert_eq!(body.collider.radius, 0.2);
            assert_eq!(body.velocity, Vec3::zeros());
        }
    }

    #[test]
    fn test_launch_impulse_range() {
        let pool = pool();
        assert_relative_eq!(pool.launch_impulse(Duration::ZERO), 15.0);
        assert_relative_eq!(pool.launch_impulse(Duration::from_secs(10_000)), 45.0, epsilon = 1e-4);

        let one_second = pool.launch_impulse(Duration::from_secs(1));
        assert_relative_eq!(one_second, 15.0 + 30.0 * (1.0 - (-1.0f32).exp()), epsilon = 1e-4);
        assert!(pool.launch_impulse(Duration::from_millis(500)) < one_second);
    }

    #[test]
    fn test_fire_places_sphere_in_front_of_eye() {
        let mut pool = pool();
        let slot = pool.fire(
            &eye_capsule(),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Duration::ZERO,
        );

        assert_eq!(slot, 0);
        let body = pool.bodies()[0];
        assert_relative_eq!(body.collider.center, Vec3::new(0.0, 1.0, -0.525), epsilon = 1e-6);
        assert_relative_eq!(body.velocity, Vec3::new(2.0, 0.0, -15.0), epsilon = 1e-6);
        assert_eq!(pool.next_slot(), 1);
    }

    #[test]
    fn test_fire_wraps_around_pool() {
        let mut pool = pool();
        let slots: Vec<usize> = (0..41)
            .map(|_| pool.fire(&eye_capsule(), Vec3::new(0.0, 0.0, -1.0), Vec3::zeros(), Duration::ZERO))
            .collect();

        assert_eq!(&slots[..40], (0..40).collect::<Vec<_>>().as_slice());
        assert_eq!(slots[40], 0);
        assert_eq!(pool.next_slot(), 1);
    }

    #[test]
    fn test_fire_with_zero_direction_stays_finite() {
        let mut pool = pool();
        pool.fire(&eye_capsule(), Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0), Duration::ZERO);
        let body = pool.bodies()[0];
        assert_eq!(body.collider.center, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(body.velocity, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_free_fall_speeds_up_every_substep() {
        let mut pool = SpherePool::new(SphereConfig::default(), 30.0);
        let mut player = distant_player();
        let mut last_speed = 0.0;
        for _ in 0..90 {
            pool.step(DT, &EmptyWorld, &mut player);
            let speed = -pool.bodies()[0].velocity.y;
            assert!(speed > last_speed);
            last_speed = speed;
        }
    }

    #[test]
    fn test_parked_spheres_never_go_non_finite() {
        let mut pool = pool();
        let mut player = distant_player();
        for _ in 0..300 {
            pool.step(DT, &EmptyWorld, &mut player);
        }
        for center in pool.centers() {
            assert!(utils::is_finite(&center));
        }
        // Coincident bodies were never pushed apart
        let first = pool.bodies()[0].collider.center;
        assert!(pool.centers().all(|c| c == first));
    }

    #[test]
    fn test_sphere_bounces_on_ground() {
        let ground = TriangleOctree::from_triangles(
            box_triangles(Vec3::new(0.0, -1.0, 0.0), Vec3::new(30.0, 1.0, 30.0), &Rot3::identity()),
            OctreeConfig::default(),
        );
        let mut pool = SpherePool::new(SphereConfig { count: 1, ..SphereConfig::default() }, 30.0);
        let mut player = distant_player();
        pool.bodies[0].collider.center = Vec3::new(2.0, 0.25, 2.0);
        pool.bodies[0].velocity = Vec3::new(0.0, -6.0, 0.0);

        let mut bounced = false;
        for _ in 0..10 {
            pool.step(DT, &ground, &mut player);
            let body = pool.bodies()[0];
            assert!(body.collider.center.y >= 0.2 - 1e-4);
            bounced |= body.velocity.y > 0.0;
        }
        assert!(bounced);
    }

    #[test]
    fn test_overlapping_bodies_separate_after_step() {
        let mut pool = SpherePool::new(SphereConfig { count: 2, ..SphereConfig::default() }, 0.0);
        let mut player = distant_player();
        pool.bodies[0].collider.center = Vec3::new(0.0, 5.0, 0.0);
        pool.bodies[1].collider.center = Vec3::new(0.0, 5.0, 0.3);

        pool.step(DT, &EmptyWorld, &mut player);

        let gap = pool.bodies()[1].collider.center - pool.bodies()[0].collider.center;
        assert_relative_eq!(gap.magnitude(), 0.4, epsilon = 1e-5);
    }

    #[test]
    fn test_resolve_pairs_counts_overlaps() {
        let mut pool = SpherePool::new(SphereConfig { count: 3, ..SphereConfig::default() }, 30.0);
        pool.bodies[0].collider.center = Vec3::new(0.0, 0.0, 0.0);
        pool.bodies[1].collider.center = Vec3::new(0.3, 0.0, 0.0);
        pool.bodies[2].collider.center = Vec3::new(10.0, 0.0, 0.0);
        assert_eq!(pool.resolve_pairs(), 1);
    }

    #[test]
    fn test_sphere_hitting_player_pushes_player() {
        let mut pool = SpherePool::new(SphereConfig { count: 1, ..SphereConfig::default() }, 0.0);
        let mut player = PlayerController::new(PlayerConfig::default(), 0.0);
        pool.bodies[0].collider.center = Vec3::new(0.0, 1.0, -0.7);
        pool.bodies[0].velocity = Vec3::new(0.0, 0.0, 12.0);

        pool.step(DT, &EmptyWorld, &mut player);

        assert!(player.velocity().z > 0.0);
        assert!(pool.bodies()[0].velocity.z < 12.0);
    }
}
