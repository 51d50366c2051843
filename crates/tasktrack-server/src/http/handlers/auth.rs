//! Registration and login handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::json_body;
use crate::http::responses::{self, LoginRequest, LoginResponse, RegisterRequest};
use crate::state::AppState;

/// Create an account.
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(response) => return response,
    };

    match state
        .auth
        .register(&req.email, &req.password, req.role.as_deref())
        .await
    {
        Ok(user) => responses::data(StatusCode::CREATED, user),
        Err(e) => e.into_response(),
    }
}

/// Exchange credentials for a bearer token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(response) => return response,
    };

    match state.auth.login(&req.email, &req.password).await {
        Ok(outcome) => responses::data(
            StatusCode::OK,
            LoginResponse {
                token: outcome.token,
                expires_at: outcome.expires_at,
                user: outcome.user,
            },
        ),
        Err(e) => e.into_response(),
    }
}
