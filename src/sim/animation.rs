//! Walk animation trigger
//!
//! Two states: idle (neutral pose, sampled at t = 0) and playing. The first
//! movement key press starts the clock; after that the animation keeps
//! playing even when every key is released, unless `idle_on_release` is set.

use serde::{Deserialize, Serialize};

use super::MoveMask;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimationTrigger {
    playing: bool,
    local_time_ms: f32,
    /// Set on the idle -> playing edge; that frame samples t = 0
    just_started: bool,
    idle_on_release: bool,
}

impl AnimationTrigger {
    pub fn new(idle_on_release: bool) -> Self {
        Self {
            idle_on_release,
            ..Default::default()
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn local_time_ms(&self) -> f32 {
        self.local_time_ms
    }

    /// A movement key was freshly pressed this frame
    pub fn on_movement_press(&mut self) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.just_started = true;
        self.local_time_ms = 0.0;
    }

    /// A movement key was released; `mask` is what is still held
    pub fn on_movement_release(&mut self, mask: MoveMask) {
        if self.idle_on_release && mask.is_empty() {
            self.playing = false;
            self.just_started = false;
            self.local_time_ms = 0.0;
        }
    }

    /// Accumulate frame time while playing
    pub fn advance(&mut self, elapsed_ms: u32) {
        if !self.playing {
            return;
        }
        if self.just_started {
            self.just_started = false;
            self.local_time_ms = 0.0;
        } else {
            self.local_time_ms += elapsed_ms as f32;
        }
    }

    /// Time to hand to the animation playback, in seconds
    pub fn sample_seconds(&self) -> f32 {
        if self.playing {
            self.local_time_ms / 1000.0
        } else {
            0.0
        }
    }
}
