//! HTTP request and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tasktrack_core::{CoreError, TaskFilter, TaskStatus, User};

// ============================================================================
// Envelopes
// ============================================================================

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Wrap `data` in the success envelope.
pub fn data<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(DataResponse { data })).into_response()
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind.
    pub error: String,
    /// Human-readable detail.
    pub message: String,
}

/// Build an error response.
pub fn error(status: StatusCode, kind: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: kind.to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}

// ============================================================================
// Auth types
// ============================================================================

/// Request body for the register endpoint.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Requested role; only `admin` has an effect.
    #[serde(default)]
    pub role: Option<String>,
}

/// Request body for the login endpoint.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body for the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

// ============================================================================
// Task types
// ============================================================================

/// Query string for the task list endpoint.
///
/// `limit` and `offset` that do not parse (or a non-positive limit) fall back
/// to the defaults; an unknown `status` is rejected.
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    pub status: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListTasksQuery {
    pub fn into_filter(self) -> Result<TaskFilter, CoreError> {
        let mut filter = TaskFilter::default();

        if let Some(status) = self.status.filter(|s| !s.is_empty()) {
            filter.status = Some(status.parse::<TaskStatus>()?);
        }
        if let Some(limit) = self
            .limit
            .and_then(|l| l.parse::<usize>().ok())
            .filter(|l| *l > 0)
        {
            filter.limit = limit;
        }
        if let Some(offset) = self.offset.and_then(|o| o.parse::<usize>().ok()) {
            filter.offset = offset;
        }

        Ok(filter)
    }
}
