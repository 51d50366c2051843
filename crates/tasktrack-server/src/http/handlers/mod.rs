//! HTTP request handlers.

mod auth;
mod health;
mod tasks;

pub use auth::{login, register};
pub use health::{health_check, metrics_handler};
pub use tasks::{create_task, delete_task, get_task, list_tasks, update_task};

use axum::extract::rejection::JsonRejection;
use axum::response::Response;
use axum::{http::StatusCode, Json};

use super::responses;

/// Unwrap a JSON body, answering malformed input with the error envelope.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        responses::error(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            format!("invalid request body: {}", rejection.body_text()),
        )
    })
}
