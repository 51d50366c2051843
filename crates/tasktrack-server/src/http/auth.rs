//! Bearer-token extractor.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::service::{ServiceError, Session};
use crate::state::AppState;

/// The caller's session, resolved from `Authorization: Bearer <token>`.
/// Rejects with 401 when the header is missing or the token is unknown or
/// expired.
#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthSession {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ServiceError::Unauthorized("missing authorization header".to_string()))?;

        let token = bearer_token(header).ok_or_else(|| {
            ServiceError::Unauthorized("invalid authorization header format".to_string())
        })?;

        state.auth.authenticate(token).await.map(AuthSession)
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
