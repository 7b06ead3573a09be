//! In-memory collaborators
//!
//! No window, no sound card: time is stepped by hand, input comes from a
//! script, and draws/sounds are recorded for inspection.

use std::collections::{HashSet, VecDeque};

use glam::{Mat4, Quat, Vec3};

use super::{AnimationPlayback, AudioService, Clock, InputSource, Locomotion, Pose, Renderer};
use crate::audio::SoundEffect;
use crate::renderer::TextureId;
use crate::sim::{KeyEvent, MoveMask};

/// Clock that advances a fixed step every time it is read
#[derive(Debug, Clone)]
pub struct SteppedClock {
    now: u64,
    step: u64,
}

impl SteppedClock {
    pub fn new(start_ms: u64, step_ms: u64) -> Self {
        Self {
            now: start_ms,
            step: step_ms,
        }
    }
}

impl Clock for SteppedClock {
    fn now_ms(&mut self) -> u64 {
        let now = self.now;
        self.now += self.step;
        now
    }
}

/// One input slot per frame; `None` means nothing arrived that frame
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Option<KeyEvent>>,
    mouse: VecDeque<(i32, i32)>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for the next unscripted frame
    pub fn then(mut self, event: KeyEvent) -> Self {
        self.frames.push_back(Some(event));
        self
    }

    /// Queue `frames` frames with no input
    pub fn idle(mut self, frames: usize) -> Self {
        self.frames.extend(std::iter::repeat_n(None, frames));
        self
    }

    pub fn push_mouse(&mut self, dx: i32, dy: i32) {
        self.mouse.push_back((dx, dy));
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll_event(&mut self) -> Option<KeyEvent> {
        self.frames.pop_front().flatten()
    }

    fn mouse_delta(&mut self) -> (i32, i32) {
        self.mouse.pop_front().unwrap_or((0, 0))
    }
}

/// Walks on the ground plane relative to the current heading; mouse X turns
#[derive(Debug, Clone)]
pub struct WalkingLocomotion {
    pose: Pose,
    /// World units per millisecond
    speed: f32,
    /// Radians per mouse count
    turn_rate: f32,
}

impl WalkingLocomotion {
    pub fn new(position: Vec3, heading: Vec3, speed: f32) -> Self {
        Self {
            pose: Pose {
                position,
                heading: heading.normalize_or(Vec3::Z),
            },
            speed,
            turn_rate: 0.005,
        }
    }
}

impl Locomotion for WalkingLocomotion {
    fn update(&mut self, elapsed_ms: u32, mask: MoveMask, mouse_dx: i32, _mouse_dy: i32) -> Pose {
        if mouse_dx != 0 {
            let turn = Quat::from_rotation_y(-(mouse_dx as f32) * self.turn_rate);
            self.pose.heading = (turn * self.pose.heading).normalize_or(Vec3::Z);
        }

        let forward = Vec3::new(self.pose.heading.x, 0.0, self.pose.heading.z).normalize_or(Vec3::Z);
        let right = Vec3::new(forward.z, 0.0, -forward.x);
        let mut dir = Vec3::ZERO;
        if mask.contains(MoveMask::FORWARD) {
            dir += forward;
        }
        if mask.contains(MoveMask::BACK) {
            dir -= forward;
        }
        if mask.contains(MoveMask::RIGHT) {
            dir += right;
        }
        if mask.contains(MoveMask::LEFT) {
            dir -= right;
        }

        self.pose.position += dir.normalize_or_zero() * self.speed * elapsed_ms as f32;
        self.pose
    }
}

/// A single recorded draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub transform: Mat4,
    pub texture: TextureId,
}

/// Keeps the draw calls of the last completed frame
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pending: Vec<DrawCall>,
    pub last_frame: Vec<DrawCall>,
    pub frames_presented: u64,
}

impl RecordingRenderer {
    pub fn count(&self, texture: TextureId) -> usize {
        self.last_frame.iter().filter(|d| d.texture == texture).count()
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self) {
        self.pending.clear();
    }

    fn draw_entity(&mut self, transform: &Mat4, texture: TextureId) {
        self.pending.push(DrawCall {
            transform: *transform,
            texture,
        });
    }

    fn end_frame(&mut self) {
        self.last_frame = std::mem::take(&mut self.pending);
    }

    fn present(&mut self) {
        self.frames_presented += 1;
    }
}

/// Tracks which sounds are playing and logs every start
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    playing: HashSet<SoundEffect>,
    pub started: Vec<(SoundEffect, bool)>,
}

impl RecordingAudio {
    pub fn times_started(&self, sound: SoundEffect) -> usize {
        self.started.iter().filter(|(s, _)| *s == sound).count()
    }
}

impl AudioService for RecordingAudio {
    fn play(&mut self, sound: SoundEffect, looping: bool) {
        self.started.push((sound, looping));
        self.playing.insert(sound);
    }

    fn stop(&mut self, sound: SoundEffect) {
        self.playing.remove(&sound);
    }

    fn is_playing(&self, sound: SoundEffect) -> bool {
        self.playing.contains(&sound)
    }
}

/// Remembers the last sample time
#[derive(Debug, Clone, Default)]
pub struct RecordingAnimation {
    pub last_sample: Option<f32>,
    pub samples: u64,
}

impl AnimationPlayback for RecordingAnimation {
    fn sample_at_time(&mut self, seconds: f32) {
        self.last_sample = Some(seconds);
        self.samples += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepped_clock() {
        let mut clock = SteppedClock::new(100, 16);
        assert_eq!(clock.now_ms(), 100);
        assert_eq!(clock.now_ms(), 116);
    }

    #[test]
    fn test_scripted_input_drains_in_order() {
        let mut input = ScriptedInput::new()
            .then(KeyEvent::Down(crate::sim::Key::Forward))
            .idle(1)
            .then(KeyEvent::Up(crate::sim::Key::Forward));
        assert_eq!(input.remaining(), 3);
        assert!(input.poll_event().is_some());
        assert!(input.poll_event().is_none());
        assert!(input.poll_event().is_some());
        assert!(input.poll_event().is_none());
        assert_eq!(input.mouse_delta(), (0, 0));
    }

    #[test]
    fn test_walking_forward() {
        let mut loco = WalkingLocomotion::new(Vec3::ZERO, Vec3::Z, 0.01);
        let pose = loco.update(100, MoveMask::FORWARD, 0, 0);
        assert!((pose.position - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);

        let pose = loco.update(100, MoveMask::empty(), 0, 0);
        assert!((pose.position - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_audio_tracks_playing() {
        let mut audio = RecordingAudio::default();
        audio.play(SoundEffect::Footstep, true);
        assert!(audio.is_playing(SoundEffect::Footstep));
        audio.stop(SoundEffect::Footstep);
        assert!(!audio.is_playing(SoundEffect::Footstep));
        assert_eq!(audio.times_started(SoundEffect::Footstep), 1);
    }
}
