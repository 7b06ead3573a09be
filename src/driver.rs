//! The outer frame loop
//!
//! One `step` is one frame: read the clock, drain at most one input event,
//! run locomotion, advance the simulation, play cues, hand the snapshot to
//! the renderer. All simulation state is owned here and only touched from
//! the calling thread.

use crate::audio::SoundBoard;
use crate::error::ConfigError;
use crate::platform::{AnimationPlayback, AudioService, Clock, InputSource, Locomotion, Renderer};
use crate::renderer::{RenderSnapshot, build_snapshot, submit};
use crate::settings::Settings;
use crate::sim::{GameEvent, MeshBounds, SimulationState, TickInput, process_input, tick};

/// Borrowed collaborators for one frame
pub struct Collaborators<'a> {
    pub clock: &'a mut dyn Clock,
    pub input: &'a mut dyn InputSource,
    pub locomotion: &'a mut dyn Locomotion,
    pub renderer: &'a mut dyn Renderer,
    pub audio: &'a mut dyn AudioService,
    pub animation: &'a mut dyn AnimationPlayback,
}

/// Result of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// Quit was requested on an earlier frame; nothing was simulated
    Quit,
}

pub struct FrameDriver {
    state: SimulationState,
    sounds: SoundBoard,
    last_time: Option<u64>,
    session_started: bool,
    snapshot: RenderSnapshot,
}

impl FrameDriver {
    pub fn new(seed: u64, settings: Settings, bounds: MeshBounds) -> Result<Self, ConfigError> {
        let state = SimulationState::new(seed, settings, bounds)?;
        log::info!("Session initialized with seed: {}", seed);
        Ok(Self {
            state,
            sounds: SoundBoard::new(),
            last_time: None,
            session_started: false,
            snapshot: RenderSnapshot::default(),
        })
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn sounds_mut(&mut self) -> &mut SoundBoard {
        &mut self.sounds
    }

    /// Snapshot handed to the renderer on the most recent frame
    pub fn snapshot(&self) -> &RenderSnapshot {
        &self.snapshot
    }

    pub fn should_quit(&self) -> bool {
        self.state.quit_requested
    }

    fn elapsed_ms(&mut self, now: u64) -> u32 {
        let elapsed = match self.last_time {
            Some(last) => now.saturating_sub(last),
            None => 0,
        };
        self.last_time = Some(now);
        u32::try_from(elapsed).unwrap_or(u32::MAX)
    }

    fn dispatch(&self, audio: &mut dyn AudioService, events: &[GameEvent]) {
        for event in events {
            log::debug!("frame {}: {:?}", self.state.frame, event);
            self.sounds.handle(audio, event);
        }
    }

    /// Run one frame
    pub fn step(&mut self, io: &mut Collaborators<'_>) -> FrameOutcome {
        if self.should_quit() {
            return FrameOutcome::Quit;
        }

        if !self.session_started {
            self.sounds.start_session(io.audio);
            self.session_started = true;
        }

        let now = io.clock.now_ms();
        let elapsed_ms = self.elapsed_ms(now);

        let event = io.input.poll_event();
        let events = process_input(&mut self.state, event);
        self.dispatch(io.audio, &events);
        if self.state.quit_requested {
            log::info!("Quit requested");
        }

        let (dx, dy) = io.input.mouse_delta();
        let pose = io
            .locomotion
            .update(elapsed_ms, self.state.player.move_mask, dx, dy);

        let events = tick(
            &mut self.state,
            &TickInput {
                elapsed_ms,
                position: pose.position,
                heading: pose.heading,
            },
        );
        self.dispatch(io.audio, &events);

        if !self.state.in_title() {
            io.animation
                .sample_at_time(self.state.animation.sample_seconds());
        }

        self.snapshot = build_snapshot(&self.state);
        submit(&self.snapshot, io.renderer);

        FrameOutcome::Continue
    }

    /// Step until quit or until `max_frames` frames have run. Returns the
    /// number of frames simulated.
    pub fn run(&mut self, io: &mut Collaborators<'_>, max_frames: Option<u64>) -> u64 {
        let mut frames = 0;
        while max_frames.is_none_or(|max| frames < max) {
            if self.step(io) == FrameOutcome::Quit {
                break;
            }
            frames += 1;
        }
        log::info!(
            "Session ended after {} frames: {} hits taken, game over = {}",
            frames,
            self.state.game.hits_taken(),
            self.state.game.is_game_over()
        );
        frames
    }
}
