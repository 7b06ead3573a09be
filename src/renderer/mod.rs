//! World snapshot for the renderer
//!
//! After each frame the driver builds a `RenderSnapshot` from the simulation
//! state and replays it against the `Renderer` collaborator. The snapshot is
//! plain data so it could just as well be handed to another thread.

pub mod snapshot;

pub use snapshot::{DrawItem, RenderSnapshot, TextureId, build_snapshot, submit};
