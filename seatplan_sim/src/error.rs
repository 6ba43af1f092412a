//! Error types for the scenario harness.

use seatplan_core::LayoutError;
use thiserror::Error;

/// Errors raised while running scenarios or processing snapshot files.
#[derive(Debug, Error)]
pub enum SimError {
    /// The optimizer rejected its input
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Reading or writing a file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
