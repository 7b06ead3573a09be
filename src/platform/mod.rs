//! Platform abstraction layer
//!
//! The simulation core talks to the outside world only through these
//! traits:
//! - Time (monotonic milliseconds)
//! - Input events and mouse movement
//! - Locomotion (player pose from held keys and mouse)
//! - Rendering, audio and skeletal animation playback
//!
//! `headless` provides in-memory implementations used by the binary and
//! the tests.

pub mod headless;

use glam::{Mat4, Vec3};

use crate::audio::SoundEffect;
use crate::renderer::TextureId;
use crate::sim::{KeyEvent, MoveMask};

/// Monotonic time source
pub trait Clock {
    /// Milliseconds since some fixed origin
    fn now_ms(&mut self) -> u64;
}

/// Buffered keyboard and mouse input
pub trait InputSource {
    /// Next pending key event, if any. Never blocks.
    fn poll_event(&mut self) -> Option<KeyEvent>;
    /// Mouse movement since the previous call
    fn mouse_delta(&mut self) -> (i32, i32);
}

/// Player pose produced by locomotion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub heading: Vec3,
}

/// Integrates held movement keys and mouse look into a new pose
pub trait Locomotion {
    fn update(&mut self, elapsed_ms: u32, mask: MoveMask, mouse_dx: i32, mouse_dy: i32) -> Pose;
}

/// Immediate-mode draw surface
pub trait Renderer {
    fn begin_frame(&mut self);
    fn draw_entity(&mut self, transform: &Mat4, texture: TextureId);
    fn end_frame(&mut self);
    /// Show the finished frame (may wait for vsync)
    fn present(&mut self);
}

/// Sound playback
pub trait AudioService {
    fn play(&mut self, sound: SoundEffect, looping: bool);
    fn stop(&mut self, sound: SoundEffect);
    fn is_playing(&self, sound: SoundEffect) -> bool;
}

/// Skeletal animation sampling for the player mesh
pub trait AnimationPlayback {
    /// Pose the skeleton at `seconds` into the walk cycle (looping is up to
    /// the implementation); 0.0 is the neutral pose.
    fn sample_at_time(&mut self, seconds: f32);
}
