//! Configuration errors
//!
//! The simulation itself has no failure modes once built; everything that
//! can go wrong is caught while constructing fields and queues.

use crate::sim::FieldKind;

/// Errors raised while loading or validating settings
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An entity field was configured with zero entities
    #[error("{kind:?} field must contain at least one entity")]
    EmptyField { kind: FieldKind },

    /// A hit marker queue was configured with zero capacity
    #[error("{kind:?} hit marker queue must have a capacity of at least one")]
    EmptyMarkerQueue { kind: FieldKind },

    /// A numeric range is inverted or otherwise unusable
    #[error("invalid {what} range: {min}..{max}")]
    InvalidRange { what: &'static str, min: f32, max: f32 },

    /// A scalar setting is out of bounds
    #[error("invalid {what}: {value}")]
    InvalidValue { what: &'static str, value: f32 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}
