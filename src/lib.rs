//! Skyfall - falling pickups and hazards around a moving player
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entity fields, collisions, hit markers,
//!   animation trigger, game state)
//! - `platform`: Collaborator interfaces (clock, input, locomotion, audio, ...)
//! - `audio`: Sound cue policy on top of the audio collaborator
//! - `renderer`: Per-frame world snapshot handed to the renderer
//! - `driver`: The outer frame loop tying everything together
//! - `settings`: Data-driven tuning loaded from JSON

pub mod audio;
pub mod driver;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use driver::FrameDriver;
pub use error::ConfigError;
pub use settings::{FieldSettings, Settings};

/// Game configuration constants (reference tuning)
pub mod consts {
    /// Collectible pool size
    pub const NUM_COLLECTIBLES: usize = 15;
    /// Hazard pool size
    pub const NUM_HAZARDS: usize = 10;

    /// Hit marker lifetime in milliseconds
    pub const HIT_MARKER_MS: i32 = 500;
    /// Billboard scale of a hit marker
    pub const HIT_MARKER_SCALE: f32 = 3.0;
    /// Constant vertical offset applied to every hit marker
    pub const HIT_MARKER_RISE_OFFSET: f32 = 12.0;

    /// Game over fires once hits taken exceeds this
    pub const GAME_OVER_THRESHOLD: u32 = 5;

    /// Uniform scale applied to the player mesh (and its bound sphere)
    pub const PLAYER_SCALE: f32 = 2.5;
    /// Radius multiplier applied to falling entity bound spheres
    pub const ENTITY_RADIUS_SCALE: f32 = 1.5;

    /// Title screen duration before the world starts moving
    pub const TITLE_DURATION_MS: u64 = 5000;
}

/// Convert a facing angle in degrees to a yaw in radians
#[inline]
pub fn yaw_from_degrees(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Yaw (radians, about +Y) that turns a billboard whose normal is +Z
/// to face back along `heading`.
#[inline]
pub fn billboard_yaw(heading: glam::Vec3) -> f32 {
    let flat = glam::Vec2::new(heading.x, heading.z);
    if flat.length_squared() < 1e-8 {
        return 0.0;
    }
    // Face the viewer: the billboard normal points opposite the camera heading
    (-flat.x).atan2(-flat.y)
}
