//! Frame-stepped simulation module
//!
//! All gameplay rules live here. This module must stay pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by pool index)
//! - No rendering, audio or platform dependencies

pub mod animation;
pub mod field;
pub mod input;
pub mod markers;
pub mod sphere;
pub mod state;
pub mod tick;

pub use animation::AnimationTrigger;
pub use field::{Entity, EntityField, FieldEvent, FieldKind};
pub use input::{Key, KeyEvent, MoveMask};
pub use markers::{HitMarker, HitMarkerQueue};
pub use sphere::{Sphere, SphereRelation, sphere_relation, spheres_collide};
pub use state::{GamePhase, GameStateMachine, MeshBounds, PlayerState, SimulationState};
pub use tick::{GameEvent, TickInput, process_input, tick};
