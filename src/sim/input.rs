//! Keyboard input as the simulation sees it

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Directional keys currently held
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MoveMask: u8 {
        const FORWARD = 1 << 0;
        const BACK = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    Escape,
    Screenshot,
    /// Anything else; ignored
    Other(u32),
}

impl Key {
    /// Mask bit for a movement key
    pub fn move_bit(self) -> Option<MoveMask> {
        match self {
            Key::Forward => Some(MoveMask::FORWARD),
            Key::Back => Some(MoveMask::BACK),
            Key::Left => Some(MoveMask::LEFT),
            Key::Right => Some(MoveMask::RIGHT),
            _ => None,
        }
    }

    /// Facing (degrees about +Y) the player turns to when this key goes down
    pub fn facing_degrees(self) -> Option<f32> {
        match self {
            Key::Forward => Some(180.0),
            Key::Back => Some(0.0),
            Key::Left => Some(270.0),
            Key::Right => Some(90.0),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Down(Key),
    Up(Key),
}
