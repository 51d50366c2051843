//! Core domain errors.

use thiserror::Error;

/// Core domain errors for tasktrack.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid state transition.
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    /// Unknown task status name.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
