//! Headless first-person sandbox
//!
//! Builds the generated fallback level and plays a scripted session against
//! it: settle, walk while turning, jump, strafe, throw a quick and a charged
//! sphere, then walk off the edge of the world and respawn. Positions are
//! reported through the log; run with `RUST_LOG=debug` for per-second
//! summaries or `RUST_LOG=trace` for every sphere.
//!
//! Usage:
//!
//! - `fps_sandbox [config.toml | config.ron]` runs the session
//! - `fps_sandbox --write-config <config.toml | config.ron>` writes the
//!   default configuration and exits

use std::time::Duration;

use fps_engine::foundation::logging;
use fps_engine::prelude::*;

/// Simulated frame rate
const FRAME_RATE: u32 = 60;

/// Frames the scripted session runs for
const SESSION_FRAMES: u32 = 1200;

/// Spheres below this height count as parked
const PARKED_BELOW: f32 = -50.0;

/// Host-side view: the camera plus what the last sync reported
struct SandboxView {
    camera: FirstPersonCamera,
    active_spheres: usize,
    respawns: u32,
}

impl SandboxView {
    fn new() -> Self {
        Self {
            camera: FirstPersonCamera::new(),
            active_spheres: 0,
            respawns: 0,
        }
    }
}

impl RenderSink for SandboxView {
    fn sync_player(&mut self, eye: Vec3) {
        self.camera.sync_player(eye);
        self.active_spheres = 0;
    }

    fn sync_sphere(&mut self, index: usize, center: Vec3) {
        if center.y > PARKED_BELOW {
            self.active_spheres += 1;
            log::trace!(
                "sphere {:2} at ({:7.2}, {:7.2}, {:7.2})",
                index,
                center.x,
                center.y,
                center.z
            );
        }
    }

    fn on_player_reset(&mut self) {
        self.respawns += 1;
        self.camera.on_player_reset();
        log::info!("Player respawned ({} so far)", self.respawns);
    }
}

/// Feed the scripted device events for `frame` into the input state
fn script(frame: u32, input: &mut InputState, camera: &mut FirstPersonCamera) {
    match frame {
        // Stand still and let the player settle on the ground
        60 => input.press(MoveIntents::FORWARD),
        // Walk forward while sweeping the view to the right
        61..=180 => camera.look(4.0, 0.0),
        181 => input.press(MoveIntents::JUMP),
        185 => input.release(MoveIntents::JUMP | MoveIntents::FORWARD),
        // Strafe and throw a quick sphere
        200 => input.press(MoveIntents::RIGHT),
        240 => input.queue_fire(Duration::ZERO),
        260 => input.release(MoveIntents::RIGHT),
        // Look up a little and throw a fully charged one
        280 => camera.look(0.0, -120.0),
        300 => input.queue_fire(Duration::from_millis(1500)),
        // Run straight for the edge of the level
        360 => {
            camera.reset();
            input.press(MoveIntents::FORWARD);
        }
        _ => {}
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut sim = match args.as_slice() {
        [flag, path] if flag == "--write-config" => {
            SimulationConfig::default().save_to_file(path)?;
            log::info!("Wrote default configuration to {}", path);
            return Ok(());
        }
        [path] => Simulation::from_config_file(path)?,
        [] => Simulation::with_fallback_world(SimulationConfig::default())?,
        _ => return Err("usage: fps_sandbox [--write-config] [config.toml | config.ron]".into()),
    };

    let mut view = SandboxView::new();
    let mut input = InputState::new();
    let mut clock = FrameClock::new();
    let frame_time = Duration::from_secs(1) / FRAME_RATE;

    log::info!("Running {} scripted frames", SESSION_FRAMES);
    let mut wall = Stopwatch::new();
    wall.start();

    for frame in 0..SESSION_FRAMES {
        script(frame, &mut input, &mut view.camera);

        let frame_delta = clock.advance(frame_time);
        let report = sim.advance_frame(frame_delta, &input.take_frame(), &view.camera);
        sim.sync_render(&report, &mut view);

        if let Some(slot) = report.fired {
            log::info!("Threw sphere {} at frame {}", slot, frame);
        }

        if frame % FRAME_RATE == 0 {
            let eye = view.camera.position;
            log::debug!(
                "t={:5.2}s eye=({:6.2}, {:6.2}, {:6.2}) on_floor={} speed={:5.2} active_spheres={}",
                clock.total_time(),
                eye.x,
                eye.y,
                eye.z,
                report.player_on_floor,
                sim.player().velocity().magnitude(),
                view.active_spheres
            );
        }
    }

    log::info!(
        "Session finished: {:.1}s simulated over {} frames in {:?}, {} respawns, {} spheres in play",
        clock.total_time(),
        clock.frame_count(),
        wall.stop(),
        view.respawns,
        view.active_spheres
    );

    Ok(())
}
