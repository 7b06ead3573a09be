//! Sound cues
//!
//! Turns simulation events into calls on the audio collaborator. The board
//! itself holds no samples; it only decides what to start and stop.

use crate::platform::AudioService;
use crate::sim::{FieldKind, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Background music, looped for the whole session
    Music,
    /// Walking; one-shot on key press, looped while a movement key is held
    Footstep,
    /// Player touched a collectible
    Collect,
    /// Player touched a hazard
    Explosion,
    /// Session ended
    GameOver,
}

/// Sound policy for a session
#[derive(Debug, Clone, Default)]
pub struct SoundBoard {
    muted: bool,
}

impl SoundBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute all cues. Muting does not stop sounds already playing.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Start the background music
    pub fn start_session(&self, audio: &mut dyn AudioService) {
        if self.muted {
            return;
        }
        audio.play(SoundEffect::Music, true);
    }

    /// React to one simulation event
    pub fn handle(&self, audio: &mut dyn AudioService, event: &GameEvent) {
        if self.muted {
            return;
        }

        match event {
            GameEvent::MovementKeyPressed(_) => audio.play(SoundEffect::Footstep, false),
            GameEvent::InputProcessed { moving: true } => {
                if !audio.is_playing(SoundEffect::Footstep) {
                    audio.play(SoundEffect::Footstep, true);
                }
            }
            GameEvent::InputProcessed { moving: false } => audio.stop(SoundEffect::Footstep),
            GameEvent::Collision {
                kind: FieldKind::Collectible,
                ..
            } => audio.play(SoundEffect::Collect, false),
            GameEvent::Collision {
                kind: FieldKind::Hazard,
                ..
            } => audio.play(SoundEffect::Explosion, false),
            GameEvent::GameOver => {
                audio.stop(SoundEffect::Music);
                audio.stop(SoundEffect::Collect);
                audio.stop(SoundEffect::Explosion);
                audio.play(SoundEffect::GameOver, false);
            }
            GameEvent::Missed { .. } | GameEvent::ScreenshotRequested | GameEvent::QuitRequested => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::RecordingAudio;
    use crate::sim::Key;
    use glam::Vec3;

    #[test]
    fn test_footstep_loop_follows_mask() {
        let board = SoundBoard::new();
        let mut audio = RecordingAudio::default();

        board.handle(&mut audio, &GameEvent::MovementKeyPressed(Key::Forward));
        board.handle(&mut audio, &GameEvent::InputProcessed { moving: true });
        // The one-shot is still "playing", so no second start
        assert_eq!(audio.times_started(SoundEffect::Footstep), 1);

        board.handle(&mut audio, &GameEvent::InputProcessed { moving: false });
        assert!(!audio.is_playing(SoundEffect::Footstep));

        board.handle(&mut audio, &GameEvent::InputProcessed { moving: true });
        assert!(audio.is_playing(SoundEffect::Footstep));
        assert_eq!(audio.started.last(), Some(&(SoundEffect::Footstep, true)));
    }

    #[test]
    fn test_collision_cues() {
        let board = SoundBoard::new();
        let mut audio = RecordingAudio::default();
        board.handle(
            &mut audio,
            &GameEvent::Collision {
                kind: FieldKind::Collectible,
                position: Vec3::ZERO,
            },
        );
        board.handle(
            &mut audio,
            &GameEvent::Collision {
                kind: FieldKind::Hazard,
                position: Vec3::ZERO,
            },
        );
        assert_eq!(audio.times_started(SoundEffect::Collect), 1);
        assert_eq!(audio.times_started(SoundEffect::Explosion), 1);
    }

    #[test]
    fn test_game_over_stops_music() {
        let board = SoundBoard::new();
        let mut audio = RecordingAudio::default();
        board.start_session(&mut audio);
        assert!(audio.is_playing(SoundEffect::Music));

        board.handle(&mut audio, &GameEvent::GameOver);
        assert!(!audio.is_playing(SoundEffect::Music));
        assert!(audio.is_playing(SoundEffect::GameOver));
    }

    #[test]
    fn test_muted_board_is_silent() {
        let mut board = SoundBoard::new();
        board.set_muted(true);
        let mut audio = RecordingAudio::default();
        board.start_session(&mut audio);
        board.handle(&mut audio, &GameEvent::GameOver);
        assert!(audio.started.is_empty());
    }
}
