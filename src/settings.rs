//! Game tuning and preferences
//!
//! Defaults reproduce the reference demo. A JSON file can override any
//! subset of fields (missing keys fall back to the defaults).

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::FieldKind;

/// Tuning for one field of falling entities
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSettings {
    /// Number of pooled entities
    pub count: usize,
    /// Home height of the first entity
    pub base_height: f32,
    /// Height added per subsequent entity (vertical stagger)
    pub height_step: f32,
    /// Per-frame descent, sampled uniformly from `[min, max)`
    pub speed_range: [f32; 2],
    /// Horizontal spawn range on X, `[min, max)`
    pub x_range: [f32; 2],
    /// Horizontal spawn range on Z, `[min, max)`
    pub z_range: [f32; 2],
    /// Multiplier applied to each entity's bound sphere radius
    pub radius_scale: f32,
    /// Hit marker ring capacity
    pub marker_capacity: usize,
    /// Whether touching the player adds to hits taken
    pub counts_collisions: bool,
    /// Whether reaching the ground uncollected adds to hits taken
    pub counts_ground_misses: bool,
}

impl FieldSettings {
    /// Reference tuning for the collectible field
    pub fn collectibles() -> Self {
        Self {
            count: NUM_COLLECTIBLES,
            base_height: 40.0,
            height_step: 50.0,
            speed_range: [0.05, 0.15],
            x_range: [-30.0, 40.0],
            z_range: [-20.0, 20.0],
            radius_scale: ENTITY_RADIUS_SCALE,
            marker_capacity: 1,
            counts_collisions: true,
            counts_ground_misses: true,
        }
    }

    /// Reference tuning for the hazard field
    pub fn hazards() -> Self {
        Self {
            count: NUM_HAZARDS,
            base_height: 50.0,
            height_step: 40.0,
            speed_range: [0.1, 0.3],
            ..Self::collectibles()
        }
    }

    /// Reject configurations that could not build a working field
    pub fn validate(&self, kind: FieldKind) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::EmptyField { kind });
        }
        if self.marker_capacity == 0 {
            return Err(ConfigError::EmptyMarkerQueue { kind });
        }
        let [lo, hi] = self.speed_range;
        if !(lo > 0.0 && lo <= hi) {
            return Err(ConfigError::InvalidRange {
                what: "descent speed",
                min: lo,
                max: hi,
            });
        }
        for (what, [lo, hi]) in [("x spawn", self.x_range), ("z spawn", self.z_range)] {
            if !(lo <= hi) {
                return Err(ConfigError::InvalidRange { what, min: lo, max: hi });
            }
        }
        if !(self.radius_scale >= 0.0) {
            return Err(ConfigError::InvalidValue {
                what: "radius scale",
                value: self.radius_scale,
            });
        }
        Ok(())
    }
}

/// Keys present in a JSON field block; absent keys keep the per-kind tuning
#[derive(Debug, Deserialize)]
struct FieldOverrides {
    count: Option<usize>,
    base_height: Option<f32>,
    height_step: Option<f32>,
    speed_range: Option<[f32; 2]>,
    x_range: Option<[f32; 2]>,
    z_range: Option<[f32; 2]>,
    radius_scale: Option<f32>,
    marker_capacity: Option<usize>,
    counts_collisions: Option<bool>,
    counts_ground_misses: Option<bool>,
}

impl FieldOverrides {
    fn apply(self, base: FieldSettings) -> FieldSettings {
        FieldSettings {
            count: self.count.unwrap_or(base.count),
            base_height: self.base_height.unwrap_or(base.base_height),
            height_step: self.height_step.unwrap_or(base.height_step),
            speed_range: self.speed_range.unwrap_or(base.speed_range),
            x_range: self.x_range.unwrap_or(base.x_range),
            z_range: self.z_range.unwrap_or(base.z_range),
            radius_scale: self.radius_scale.unwrap_or(base.radius_scale),
            marker_capacity: self.marker_capacity.unwrap_or(base.marker_capacity),
            counts_collisions: self.counts_collisions.unwrap_or(base.counts_collisions),
            counts_ground_misses: self
                .counts_ground_misses
                .unwrap_or(base.counts_ground_misses),
        }
    }
}

fn collectible_fields<'de, D: Deserializer<'de>>(d: D) -> Result<FieldSettings, D::Error> {
    FieldOverrides::deserialize(d).map(|o| o.apply(FieldSettings::collectibles()))
}

fn hazard_fields<'de, D: Deserializer<'de>>(d: D) -> Result<FieldSettings, D::Error> {
    FieldOverrides::deserialize(d).map(|o| o.apply(FieldSettings::hazards()))
}

/// Complete simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(deserialize_with = "collectible_fields")]
    pub collectibles: FieldSettings,
    #[serde(deserialize_with = "hazard_fields")]
    pub hazards: FieldSettings,

    /// Lifetime of a freshly pushed hit marker
    pub hit_marker_ms: i32,
    /// Billboard scale of hit markers (also drives their rise)
    pub hit_marker_scale: f32,
    /// Constant height added to every hit marker
    pub hit_marker_rise_offset: f32,

    /// Hits taken must exceed this to end the game
    pub game_over_threshold: u32,
    /// Player mesh scale
    pub player_scale: f32,
    /// How long the title screen holds the world still
    pub title_duration_ms: u64,
    /// Drop back to the neutral pose once no movement key is held
    pub animation_idle_on_release: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            collectibles: FieldSettings::collectibles(),
            hazards: FieldSettings::hazards(),
            hit_marker_ms: HIT_MARKER_MS,
            hit_marker_scale: HIT_MARKER_SCALE,
            hit_marker_rise_offset: HIT_MARKER_RISE_OFFSET,
            game_over_threshold: GAME_OVER_THRESHOLD,
            player_scale: PLAYER_SCALE,
            title_duration_ms: TITLE_DURATION_MS,
            animation_idle_on_release: false,
        }
    }
}

impl Settings {
    /// Settings with the title screen disabled (handy for tests and demos)
    pub fn without_title(mut self) -> Self {
        self.title_duration_ms = 0;
        self
    }

    pub fn field(&self, kind: FieldKind) -> &FieldSettings {
        match kind {
            FieldKind::Collectible => &self.collectibles,
            FieldKind::Hazard => &self.hazards,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.collectibles.validate(FieldKind::Collectible)?;
        self.hazards.validate(FieldKind::Hazard)?;
        if self.hit_marker_ms <= 0 {
            return Err(ConfigError::InvalidValue {
                what: "hit marker duration",
                value: self.hit_marker_ms as f32,
            });
        }
        if !(self.player_scale >= 0.0) {
            return Err(ConfigError::InvalidValue {
                what: "player scale",
                value: self.player_scale,
            });
        }
        Ok(())
    }

    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&contents)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!(
                    "Could not load settings from {}: {} - using defaults",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        // Plain data with no maps keyed by non-strings; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.collectibles.count, 15);
        assert_eq!(settings.hazards.count, 10);
        assert_eq!(settings.game_over_threshold, 5);
    }

    #[test]
    fn test_empty_field_rejected() {
        let mut settings = Settings::default();
        settings.hazards.count = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::EmptyField { kind: FieldKind::Hazard })
        ));
    }

    #[test]
    fn test_empty_marker_queue_rejected() {
        let mut settings = Settings::default();
        settings.collectibles.marker_capacity = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::EmptyMarkerQueue { kind: FieldKind::Collectible })
        ));
    }

    #[test]
    fn test_inverted_speed_range_rejected() {
        let mut settings = Settings::default();
        settings.collectibles.speed_range = [0.5, 0.1];
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "game_over_threshold": 9, "hazards": { "count": 3 } }"#)
            .expect("valid json");
        assert_eq!(settings.game_over_threshold, 9);
        assert_eq!(settings.hazards.count, 3);
        assert_eq!(settings.collectibles, FieldSettings::collectibles());
    }

    #[test]
    fn test_partial_field_block_keeps_its_own_tuning() {
        let settings = Settings::from_json(r#"{ "hazards": { "count": 3 } }"#).expect("valid json");
        let hazards = &settings.hazards;
        assert_eq!(hazards.count, 3);
        assert_eq!(hazards.base_height, 50.0);
        assert_eq!(hazards.height_step, 40.0);
        assert_eq!(hazards.speed_range, [0.1, 0.3]);

        let settings =
            Settings::from_json(r#"{ "collectibles": { "base_height": 5.0 } }"#).expect("valid json");
        assert_eq!(settings.collectibles.base_height, 5.0);
        assert_eq!(settings.collectibles.height_step, 50.0);
        assert_eq!(settings.hazards, FieldSettings::hazards());
    }

    #[test]
    fn test_field_lookup_by_kind() {
        let settings = Settings::default();
        assert_eq!(settings.field(FieldKind::Collectible).base_height, 40.0);
        assert_eq!(settings.field(FieldKind::Hazard).base_height, 50.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings::default().without_title();
        let parsed = Settings::from_json(&settings.to_json()).expect("roundtrip");
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/definitely/not/here.json");
        assert_eq!(settings, Settings::default());
    }
}
