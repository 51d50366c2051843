//! Request-layer services.

mod auth_service;
mod task_service;

pub use auth_service::{AuthService, LoginOutcome, Session};
pub use task_service::TaskService;

use thiserror::Error;

use tasktrack_core::CoreError;

use crate::store::StoreError;

/// Errors surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Store(StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidStateTransition { from, to } => Self::InvalidTransition { from, to },
            CoreError::InvalidStatus(status) => {
                Self::InvalidInput(format!("unknown status '{}'", status))
            }
            CoreError::InvalidInput(msg) => Self::InvalidInput(msg),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Conflict(key) => Self::Conflict(key),
            StoreError::Rejected(e) => e.into(),
            other => Self::Store(other),
        }
    }
}
