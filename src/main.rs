//! Skyfall headless entry point
//!
//! Runs a scripted session against in-memory collaborators and logs the
//! outcome. Usage: `skyfall [settings.json] [frames]`

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec3;

use skyfall::Settings;
use skyfall::driver::{Collaborators, FrameDriver};
use skyfall::platform::headless::{
    RecordingAnimation, RecordingAudio, RecordingRenderer, ScriptedInput, SteppedClock,
    WalkingLocomotion,
};
use skyfall::sim::{Key, KeyEvent, MeshBounds, Sphere};

/// Roughly 60 frames per second
const FRAME_MS: u64 = 16;
const DEFAULT_FRAMES: u64 = 60 * 60;

/// Milliseconds since the epoch; 0 for clocks set before it
fn clock_seed(now: SystemTime) -> u64 {
    now.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| u64::try_from(d.as_millis()).ok())
        .unwrap_or(0)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Skyfall (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let frames = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let seed = clock_seed(SystemTime::now());

    // Stand-ins for the bound spheres a mesh loader would report
    let bounds = MeshBounds {
        player: Sphere::new(Vec3::new(0.0, 3.0, 0.0), 2.0),
        collectible: Sphere::new(Vec3::ZERO, 1.0),
        hazard: Sphere::new(Vec3::ZERO, 1.5),
    };

    let mut driver = match FrameDriver::new(seed, settings, bounds) {
        Ok(driver) => driver,
        Err(e) => {
            log::error!("Invalid settings: {}", e);
            std::process::exit(1);
        }
    };

    // Wander back and forth across the drop zone
    let mut script = ScriptedInput::new();
    for _ in 0..(frames / 240).max(1) {
        script = script
            .then(KeyEvent::Down(Key::Right))
            .idle(118)
            .then(KeyEvent::Up(Key::Right))
            .then(KeyEvent::Down(Key::Left))
            .idle(118)
            .then(KeyEvent::Up(Key::Left));
    }

    let mut clock = SteppedClock::new(0, FRAME_MS);
    let mut locomotion = WalkingLocomotion::new(Vec3::ZERO, Vec3::Z, 0.02);
    let mut renderer = RecordingRenderer::default();
    let mut audio = RecordingAudio::default();
    let mut animation = RecordingAnimation::default();

    let mut io = Collaborators {
        clock: &mut clock,
        input: &mut script,
        locomotion: &mut locomotion,
        renderer: &mut renderer,
        audio: &mut audio,
        animation: &mut animation,
    };
    driver.run(&mut io, Some(frames));

    let state = driver.state();
    log::info!(
        "Frames presented: {}, hits taken: {}, game over: {}",
        renderer.frames_presented,
        state.game.hits_taken(),
        state.game.is_game_over()
    );
}
