//! Short-lived hit markers
//!
//! A ring of fixed capacity. Pushing always overwrites the slot under the
//! write cursor, live or not, so a full ring silently drops its oldest cue.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::FieldKind;
use crate::error::ConfigError;

/// A visual cue left where something hit the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitMarker {
    pub position: Vec3,
    /// Time left before the marker disappears; negative means expired
    pub remaining_ms: i32,
    /// Lifetime the marker was pushed with
    pub duration_ms: i32,
}

impl HitMarker {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0
    }

    /// 0.0 when freshly pushed, approaching 1.0 as it expires
    pub fn normalized_age(&self) -> f32 {
        if self.duration_ms <= 0 {
            return 1.0;
        }
        1.0 - self.remaining_ms as f32 / self.duration_ms as f32
    }
}

/// Fixed-capacity ring buffer of hit markers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawQueue")]
pub struct HitMarkerQueue {
    slots: Vec<Option<HitMarker>>,
    cursor: usize,
}

/// Unchecked wire form; a ring needs at least one slot and a cursor inside it
#[derive(Deserialize)]
struct RawQueue {
    slots: Vec<Option<HitMarker>>,
    cursor: usize,
}

impl TryFrom<RawQueue> for HitMarkerQueue {
    type Error = &'static str;

    fn try_from(raw: RawQueue) -> Result<Self, Self::Error> {
        if raw.slots.is_empty() {
            return Err("hit marker queue has no slots");
        }
        if raw.cursor >= raw.slots.len() {
            return Err("hit marker cursor out of range");
        }
        Ok(Self {
            slots: raw.slots,
            cursor: raw.cursor,
        })
    }
}

impl HitMarkerQueue {
    pub fn new(kind: FieldKind, capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::EmptyMarkerQueue { kind });
        }
        Ok(Self {
            slots: vec![None; capacity],
            cursor: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Write a marker at the cursor and advance it
    pub fn push(&mut self, position: Vec3, duration_ms: i32) {
        self.slots[self.cursor] = Some(HitMarker {
            position,
            remaining_ms: duration_ms,
            duration_ms,
        });
        self.cursor = (self.cursor + 1) % self.slots.len();
    }

    /// Age every marker by `elapsed_ms`. Expired markers keep counting down.
    pub fn tick(&mut self, elapsed_ms: u32) {
        let elapsed = i32::try_from(elapsed_ms).unwrap_or(i32::MAX);
        for marker in self.slots.iter_mut().flatten() {
            marker.remaining_ms = marker.remaining_ms.saturating_sub(elapsed);
        }
    }

    /// Live markers with their normalized age, in slot order
    pub fn active_markers(&self) -> impl Iterator<Item = (Vec3, f32)> + '_ {
        self.slots
            .iter()
            .flatten()
            .filter(|m| m.is_active())
            .map(|m| (m.position, m.normalized_age()))
    }

    pub fn markers(&self) -> impl Iterator<Item = &HitMarker> + '_ {
        self.slots.iter().flatten()
    }
}
