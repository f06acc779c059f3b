//! Frame-level behavior of the assembled simulation

use std::time::Duration;

use approx::assert_relative_eq;

use super::*;
use crate::input::MoveIntents;
use crate::physics::response::resolve_sphere_pair;
use crate::physics::{BoundingSphere, EmptyWorld};
use crate::view::FirstPersonCamera;

const FRAME: f32 = 1.0 / 60.0;

fn empty_sim() -> Simulation {
    Simulation::new(SimulationConfig::default(), Box::new(EmptyWorld)).expect("default config is valid")
}

fn flat_sim() -> Simulation {
    let mut config = SimulationConfig::default();
    config.world.box_count = 0;
    Simulation::with_fallback_world(config).expect("default config is valid")
}

#[derive(Default)]
struct RecordingSink {
    eye: Option<Vec3>,
    spheres: Vec<(usize, Vec3)>,
    resets: usize,
}

impl RenderSink for RecordingSink {
    fn sync_player(&mut self, eye: Vec3) {
        self.eye = Some(eye);
    }

    fn sync_sphere(&mut self, index: usize, center: Vec3) {
        self.spheres.push((index, center));
    }

    fn on_player_reset(&mut self) {
        self.resets += 1;
    }
}

#[test]
fn test_invalid_config_is_rejected() {
    let zero_substeps = SimulationConfig::default().with_substeps(0);
    assert!(matches!(
        Simulation::new(zero_substeps, Box::new(EmptyWorld)),
        Err(SimulationError::InvalidConfig(_))
    ));

    let no_spheres = SimulationConfig::default().with_sphere_count(0);
    assert!(matches!(
        Simulation::with_fallback_world(no_spheres),
        Err(SimulationError::InvalidConfig(_))
    ));

    let mut bad_radius = SimulationConfig::default();
    bad_radius.player.radius = f32::NAN;
    assert!(Simulation::new(bad_radius, Box::new(EmptyWorld)).is_err());

    let upside_down = SimulationConfig::default().with_gravity(-30.0);
    assert!(Simulation::new(upside_down, Box::new(EmptyWorld)).is_err());
}

#[test]
fn test_substep_delta_clamps_frame() {
    let sim = empty_sim();
    assert_relative_eq!(sim.substep_delta(0.03), 0.01, epsilon = 1e-7);
    assert_relative_eq!(sim.substep_delta(0.5), 0.05 / 3.0, epsilon = 1e-7);
    assert_eq!(sim.substep_delta(-1.0), 0.0);
    assert_eq!(sim.substep_delta(f32::NAN), 0.0);
    assert_eq!(sim.substep_delta(f32::INFINITY), 0.0);
}

#[test]
fn test_frame_runs_configured_substeps() {
    let mut sim = Simulation::new(SimulationConfig::default().with_substeps(5), Box::new(EmptyWorld))
        .expect("valid config");
    let camera = FirstPersonCamera::new();

    let report = sim.advance_frame(0.05, &FrameInput::default(), &camera);
    assert_eq!(report.substeps, 5);
    assert_relative_eq!(report.substep_delta, 0.01, epsilon = 1e-7);
    assert_eq!(report.fired, None);
    assert!(!report.player_reset);
    assert!(!report.player_on_floor);
}

#[test]
fn test_free_fall_speeds_up_every_frame() {
    let mut sim = empty_sim();
    let camera = FirstPersonCamera::new();
    let mut last_speed = 0.0;

    for _ in 0..20 {
        sim.advance_frame(FRAME, &FrameInput::default(), &camera);
        let speed = -sim.player().velocity().y;
        assert!(speed > last_speed);
        last_speed = speed;
    }
}

#[test]
fn test_overlapping_spheres_separate_along_z() {
    let mut a = BoundingSphere::new(Vec3::new(0.0, 0.0, 0.0), 0.2);
    let mut b = BoundingSphere::new(Vec3::new(0.0, 0.0, 0.3), 0.2);
    let (mut va, mut vb) = (Vec3::zeros(), Vec3::zeros());

    resolve_sphere_pair(&mut a, &mut va, &mut b, &mut vb);

    assert_relative_eq!(a.center, Vec3::new(0.0, 0.0, -0.05), epsilon = 1e-6);
    assert_relative_eq!(b.center, Vec3::new(0.0, 0.0, 0.35), epsilon = 1e-6);
}

#[test]
fn test_launch_impulse_limits() {
    let sim = empty_sim();
    assert_relative_eq!(sim.spheres().launch_impulse(Duration::ZERO), 15.0);
    assert_relative_eq!(
        sim.spheres().launch_impulse(Duration::from_secs(3600)),
        45.0,
        epsilon = 1e-4
    );
}

#[test]
fn test_forty_first_throw_reuses_first_slot() {
    let mut sim = empty_sim();
    let forward = Vec3::new(0.0, 0.0, -1.0);
    for expected in 0..40 {
        assert_eq!(sim.fire(forward, Duration::ZERO), expected);
    }
    assert_eq!(sim.fire(forward, Duration::ZERO), 0);
}

#[test]
fn test_eye_exactly_at_threshold_respawns() {
    let mut sim = empty_sim();
    let camera = FirstPersonCamera::new();
    sim.player_mut().translate(Vec3::new(0.0, -26.0, 0.0));
    assert_eq!(sim.player().eye_position().y, -25.0);

    let report = sim.advance_frame(0.0, &FrameInput::default(), &camera);

    assert!(report.player_reset);
    assert_eq!(sim.player().eye_position(), Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(sim.player().velocity(), Vec3::zeros());
}

#[test]
fn test_falling_forever_respawns_and_notifies_sink() {
    let mut sim = empty_sim();
    let mut camera = FirstPersonCamera::new();
    camera.look(200.0, 50.0);

    let mut frames = 0;
    let report = loop {
        let report = sim.advance_frame(0.05, &FrameInput::default(), &camera);
        frames += 1;
        if report.player_reset || frames > 600 {
            break report;
        }
    };
    assert!(report.player_reset);

    let mut sink = RecordingSink::default();
    sim.sync_render(&report, &mut sink);
    camera.on_player_reset();

    assert_eq!(sink.resets, 1);
    assert!(sink.eye.is_some_and(|eye| eye.y > -25.0));
    assert_eq!(camera.yaw, 0.0);
}

#[test]
fn test_fire_from_input_lands_in_front_of_player() {
    let mut sim = empty_sim();
    let camera = FirstPersonCamera::new();
    let input = FrameInput::default().with_fire(Duration::from_millis(300));

    let report = sim.advance_frame(FRAME, &input, &camera);

    assert_eq!(report.fired, Some(0));
    assert_eq!(sim.spheres().next_slot(), 1);
    let thrown = sim.spheres().bodies()[0];
    assert!(thrown.collider.center.z < -0.5);
    assert!(thrown.velocity.z < -15.0);
}

#[test]
fn test_walking_on_flat_ground() {
    let mut sim = flat_sim();
    let camera = FirstPersonCamera::new();
    let input = FrameInput::new(MoveIntents::FORWARD);

    sim.advance_frame(FRAME, &FrameInput::default(), &camera);
    let mut grounded_frames = 0;
    for _ in 0..60 {
        let report = sim.advance_frame(FRAME, &input, &camera);
        assert!(!report.player_reset);
        if report.player_on_floor {
            grounded_frames += 1;
        }
    }

    assert!(grounded_frames > 30);
    assert!(sim.player().collider().start.z < -1.0);
    assert_relative_eq!(sim.player().collider().start.y, 0.35, epsilon = 0.05);
}

#[test]
fn test_jump_leaves_the_ground() {
    let mut sim = flat_sim();
    let camera = FirstPersonCamera::new();

    for _ in 0..5 {
        sim.advance_frame(FRAME, &FrameInput::default(), &camera);
    }
    assert!(sim.player().on_floor());

    sim.advance_frame(FRAME, &FrameInput::new(MoveIntents::JUMP), &camera);
    let mut peak: f32 = 0.0;
    for _ in 0..20 {
        sim.advance_frame(FRAME, &FrameInput::default(), &camera);
        peak = peak.max(sim.player().collider().start.y);
    }
    assert!(peak > 1.0);
}

#[test]
fn test_thrown_sphere_settles_above_ground() {
    let mut sim = flat_sim();
    let camera = FirstPersonCamera::new();
    let down_and_ahead = Vec3::new(0.0, -1.0, -1.0);

    sim.fire(down_and_ahead, Duration::ZERO);
    for _ in 0..240 {
        sim.advance_frame(FRAME, &FrameInput::default(), &camera);
    }

    let sphere = sim.spheres().bodies()[0].collider;
    assert!(sphere.center.y >= sphere.radius - 0.01);
    assert!(sphere.center.y < 2.0);
}

#[test]
fn test_sync_render_exports_every_sphere() {
    let mut sim = empty_sim();
    let camera = FirstPersonCamera::new();
    let report = sim.advance_frame(FRAME, &FrameInput::default(), &camera);

    let mut sink = RecordingSink::default();
    sim.sync_render(&report, &mut sink);

    assert_eq!(sink.resets, 0);
    assert_eq!(sink.eye, Some(sim.player().eye_position()));
    assert_eq!(sink.spheres.len(), 40);
    assert!(sink.spheres.iter().enumerate().all(|(i, (index, _))| i == *index));
}

#[test]
fn test_from_config_file() {
    let dir = std::env::temp_dir().join(format!("fps_engine_sim_{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");

    let path = dir.join("sim.toml");
    std::fs::write(
        &path,
        "gravity = 20.0\n\n[spheres]\ncount = 8\n\n[world]\nbox_count = 4\n",
    )
    .expect("write config");

    let sim = Simulation::from_config_file(&path).expect("config loads");
    assert_eq!(sim.config().gravity, 20.0);
    assert_eq!(sim.spheres().len(), 8);
    assert_eq!(sim.config().stepping.substeps, 3);

    assert!(matches!(
        Simulation::from_config_file(dir.join("missing.toml")),
        Err(SimulationError::Config(ConfigError::Io(_)))
    ));
    assert!(matches!(
        Simulation::from_config_file(dir.join("sim.json")),
        Err(SimulationError::Config(ConfigError::UnsupportedFormat(_)))
    ));

    let _ = std::fs::remove_dir_all(&dir);
}
