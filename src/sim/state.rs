//! Simulation state and core types
//!
//! Everything the frame loop mutates lives in `SimulationState`, owned by
//! the driver and passed by `&mut` into each update.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::AnimationTrigger;
use super::field::{EntityField, FieldKind};
use super::input::MoveMask;
use super::markers::HitMarkerQueue;
use super::sphere::Sphere;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Terminal; nothing falls or counts any more
    GameOver,
}

/// Hit counter with a one-way transition to game over
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateMachine {
    hits_taken: u32,
    threshold: u32,
    phase: GamePhase,
    /// The game-over cue has been handed out
    cue_emitted: bool,
}

impl GameStateMachine {
    pub fn new(threshold: u32) -> Self {
        Self {
            hits_taken: 0,
            threshold,
            phase: GamePhase::Playing,
            cue_emitted: false,
        }
    }

    pub fn hits_taken(&self) -> u32 {
        self.hits_taken
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Count one hit. Returns false (and changes nothing) once the game is over.
    pub fn record_hit(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.hits_taken += 1;
        if self.hits_taken > self.threshold {
            self.phase = GamePhase::GameOver;
        }
        true
    }

    /// Per-frame check. Returns true exactly once: on the frame the game ends.
    pub fn evaluate(&mut self) -> bool {
        if self.hits_taken > self.threshold {
            self.phase = GamePhase::GameOver;
        }
        if self.is_game_over() && !self.cue_emitted {
            self.cue_emitted = true;
            return true;
        }
        false
    }
}

/// Model-space bound spheres of the meshes the simulation collides
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshBounds {
    pub player: Sphere,
    pub collectible: Sphere,
    pub hazard: Sphere,
}

/// The player's transform inputs and collision volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    pub heading: Vec3,
    /// One of 0, 90, 180, 270; set by the last movement key pressed
    pub facing_degrees: f32,
    pub move_mask: MoveMask,
    /// Uniform mesh scale
    pub scale: f32,
    /// Model-space bound sphere of the player mesh
    pub base_sphere: Sphere,
    /// World-space bound sphere, refreshed every frame
    pub bound_sphere: Sphere,
}

impl PlayerState {
    pub fn new(base_sphere: Sphere, scale: f32) -> Self {
        let mut player = Self {
            position: Vec3::ZERO,
            heading: Vec3::Z,
            facing_degrees: 180.0,
            move_mask: MoveMask::empty(),
            scale,
            base_sphere,
            bound_sphere: base_sphere,
        };
        player.update_bound_sphere();
        player
    }

    /// Scale the mesh sphere, then move it to the player position
    pub fn update_bound_sphere(&mut self) {
        self.bound_sphere = self.base_sphere.scaled(self.scale).translated(self.position);
    }
}

/// Complete simulation state (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: Settings,
    /// Frames simulated so far
    pub frame: u64,
    /// Sum of elapsed frame times
    pub session_ms: u64,
    pub player: PlayerState,
    pub collectibles: EntityField,
    pub hazards: EntityField,
    pub collect_markers: HitMarkerQueue,
    pub hazard_markers: HitMarkerQueue,
    pub animation: AnimationTrigger,
    pub game: GameStateMachine,
    /// Capture requested this frame (one-shot)
    pub screenshot_requested: bool,
    pub quit_requested: bool,
}

impl SimulationState {
    /// Build a fresh session. Fails if any field or queue would be empty.
    pub fn new(seed: u64, settings: Settings, bounds: MeshBounds) -> Result<Self, ConfigError> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);

        let collectibles = EntityField::new(
            FieldKind::Collectible,
            &settings.collectibles,
            bounds.collectible,
            &mut rng,
        )?;
        let hazards =
            EntityField::new(FieldKind::Hazard, &settings.hazards, bounds.hazard, &mut rng)?;
        let collect_markers =
            HitMarkerQueue::new(FieldKind::Collectible, settings.collectibles.marker_capacity)?;
        let hazard_markers =
            HitMarkerQueue::new(FieldKind::Hazard, settings.hazards.marker_capacity)?;

        Ok(Self {
            seed,
            rng,
            frame: 0,
            session_ms: 0,
            player: PlayerState::new(bounds.player, settings.player_scale),
            collectibles,
            hazards,
            collect_markers,
            hazard_markers,
            animation: AnimationTrigger::new(settings.animation_idle_on_release),
            game: GameStateMachine::new(settings.game_over_threshold),
            screenshot_requested: false,
            quit_requested: false,
            settings,
        })
    }

    /// Still showing the title screen
    pub fn in_title(&self) -> bool {
        self.session_ms < self.settings.title_duration_ms
    }

    pub fn field(&self, kind: FieldKind) -> &EntityField {
        match kind {
            FieldKind::Collectible => &self.collectibles,
            FieldKind::Hazard => &self.hazards,
        }
    }

    pub fn markers(&self, kind: FieldKind) -> &HitMarkerQueue {
        match kind {
            FieldKind::Collectible => &self.collect_markers,
            FieldKind::Hazard => &self.hazard_markers,
        }
    }
}
