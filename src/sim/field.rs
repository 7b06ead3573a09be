//! Pools of falling entities
//!
//! A field owns a fixed number of entities that fall at their own constant
//! rate, get recycled to their home height when they reach the ground, and
//! are consumed when they touch the player. Entities are never created or
//! destroyed after construction.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::sphere::{Sphere, spheres_collide};
use crate::error::ConfigError;
use crate::settings::FieldSettings;

/// Which of the two fields an entity or event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Things the player wants to touch
    Collectible,
    /// Things the player wants to avoid
    Hazard,
}

/// A single falling entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub position: Vec3,
    /// Height lost every frame (always > 0)
    pub descent_speed: f32,
    /// Height the entity resets to when recycled
    pub home_height: f32,
    /// Pool membership; stays true for the entity's whole life
    pub alive: bool,
    /// Touched by the player: no longer falls, recycles or draws
    pub consumed: bool,
}

impl Entity {
    /// Active entities fall, recycle, collide and draw
    #[inline]
    pub fn is_active(&self) -> bool {
        self.alive && !self.consumed
    }
}

/// Something that happened to a field during a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldEvent {
    /// Entity reached the ground uncollected and went back to its home height
    Recycled { kind: FieldKind, index: usize },
    /// Entity touched the player at `position` (world bound-sphere center)
    Collision {
        kind: FieldKind,
        index: usize,
        position: Vec3,
    },
}

/// Uniform sample from `[lo, hi)`, collapsing to `lo` for empty ranges
fn sample_range<R: Rng + ?Sized>(rng: &mut R, [lo, hi]: [f32; 2]) -> f32 {
    if lo < hi { rng.random_range(lo..hi) } else { lo }
}

/// A fixed-size pool of falling entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityField {
    kind: FieldKind,
    entities: Vec<Entity>,
    /// Model-space bound sphere shared by every entity in the field
    base_sphere: Sphere,
    radius_scale: f32,
    x_range: [f32; 2],
    z_range: [f32; 2],
    /// Set on game over; freezes and hides the whole field
    suspended: bool,
}

impl EntityField {
    /// Build a field of `settings.count` entities.
    ///
    /// Home heights form the sequence `base_height + i * height_step`, so the
    /// pool starts vertically staggered. Horizontal position and descent
    /// speed are drawn uniformly from the configured ranges.
    pub fn new<R: Rng + ?Sized>(
        kind: FieldKind,
        settings: &FieldSettings,
        base_sphere: Sphere,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        settings.validate(kind)?;

        let entities = (0..settings.count)
            .map(|i| {
                let home_height = settings.base_height + i as f32 * settings.height_step;
                Entity {
                    position: Vec3::new(
                        sample_range(rng, settings.x_range),
                        home_height,
                        sample_range(rng, settings.z_range),
                    ),
                    descent_speed: sample_range(rng, settings.speed_range),
                    home_height,
                    alive: true,
                    consumed: false,
                }
            })
            .collect();

        Ok(Self {
            kind,
            entities,
            base_sphere,
            radius_scale: settings.radius_scale,
            x_range: settings.x_range,
            z_range: settings.z_range,
            suspended: false,
        })
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.entities.get_mut(index)
    }

    pub fn radius_scale(&self) -> f32 {
        self.radius_scale
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Freeze and hide the field for the rest of the session
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Descend every active entity by its fixed per-frame speed.
    ///
    /// Descent deliberately ignores `_elapsed_ms`: it is one step per frame.
    /// An entity at or below the ground goes back to its home height at a
    /// fresh horizontal position and yields a `Recycled` event.
    pub fn advance<R: Rng + ?Sized>(&mut self, _elapsed_ms: u32, rng: &mut R) -> Vec<FieldEvent> {
        let mut events = Vec::new();
        if self.suspended {
            return events;
        }

        for (index, entity) in self.entities.iter_mut().enumerate() {
            if !entity.is_active() {
                continue;
            }
            entity.position.y -= entity.descent_speed;
            if entity.position.y <= 0.0 {
                entity.position = Vec3::new(
                    sample_range(rng, self.x_range),
                    entity.home_height,
                    sample_range(rng, self.z_range),
                );
                log::debug!("{:?} {} recycled", self.kind, index);
                events.push(FieldEvent::Recycled {
                    kind: self.kind,
                    index,
                });
            }
        }

        events
    }

    /// World-space bound sphere of the entity at `index`
    pub fn world_sphere(&self, index: usize) -> Option<Sphere> {
        self.entities.get(index).map(|e| self.sphere_for(e))
    }

    fn sphere_for(&self, entity: &Entity) -> Sphere {
        self.base_sphere
            .translated(entity.position)
            .inflated(self.radius_scale)
    }

    /// Consume every active entity touching `player` and report each hit.
    pub fn test_collisions(&mut self, player: &Sphere) -> Vec<FieldEvent> {
        let mut events = Vec::new();
        if self.suspended {
            return events;
        }

        for index in 0..self.entities.len() {
            if !self.entities[index].is_active() {
                continue;
            }
            let sphere = self.sphere_for(&self.entities[index]);
            if spheres_collide(player, &sphere) {
                self.entities[index].consumed = true;
                log::debug!("{:?} {} hit at {}", self.kind, index, sphere.center);
                events.push(FieldEvent::Collision {
                    kind: self.kind,
                    index,
                    position: sphere.center,
                });
            }
        }

        events
    }

    /// Entities the renderer should draw this frame (index, entity)
    pub fn drawable(&self) -> impl Iterator<Item = (usize, &Entity)> + '_ {
        let suspended = self.suspended;
        self.entities
            .iter()
            .enumerate()
            .filter(move |(_, e)| !suspended && e.is_active())
    }

    /// Bring every consumed entity back into play (session restart)
    pub fn reset_consumed(&mut self) {
        for entity in &mut self.entities {
            entity.consumed = false;
        }
        self.suspended = false;
    }
}
