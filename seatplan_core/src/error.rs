//! Error types for the layout optimizer.

use crate::roster::EntityId;
use thiserror::Error;

/// Errors that reject an optimizer call before any iteration runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// Canvas width or height is not a positive finite number
    #[error("Invalid canvas {width}x{height}: both dimensions must be positive")]
    InvalidCanvas { width: f32, height: f32 },

    /// The same entity id appears more than once in the roster
    #[error("Duplicate entity id: {0}")]
    DuplicateEntity(EntityId),

    /// An input coordinate is NaN or infinite
    #[error("Entity {id} has a non-finite position")]
    NonFinitePosition { id: EntityId },

    /// A tuning parameter is out of range
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl LayoutError {
    /// Creates an invalid parameter error.
    pub fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, LayoutError>;
