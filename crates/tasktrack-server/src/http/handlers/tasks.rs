//! Task CRUD handlers. All routes require a bearer token.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use tasktrack_core::{NewTask, TaskId, TaskPatch};

use super::json_body;
use crate::http::auth::AuthSession;
use crate::http::responses::{self, ListTasksQuery};
use crate::service::ServiceError;
use crate::state::AppState;

/// Create a task; it is scheduled for auto-completion.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    AuthSession(session): AuthSession,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Response {
    let input = match json_body(payload) {
        Ok(input) => input,
        Err(response) => return response,
    };

    match state.task_service.create(&session, input).await {
        Ok(task) => responses::data(StatusCode::CREATED, task),
        Err(e) => e.into_response(),
    }
}

/// List visible tasks, newest first.
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    AuthSession(session): AuthSession,
    Query(query): Query<ListTasksQuery>,
) -> Response {
    let filter = match query.into_filter() {
        Ok(filter) => filter,
        Err(e) => return ServiceError::from(e).into_response(),
    };

    match state.task_service.list(&session, filter).await {
        Ok(tasks) => responses::data(StatusCode::OK, tasks),
        Err(e) => e.into_response(),
    }
}

pub async fn get_task(
    State(state): State<Arc<AppState>>,
    AuthSession(session): AuthSession,
    Path(id): Path<String>,
) -> Response {
    match state.task_service.get(&session, &TaskId::new(id)).await {
        Ok(task) => responses::data(StatusCode::OK, task),
        Err(e) => e.into_response(),
    }
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    AuthSession(session): AuthSession,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Response {
    let patch = match json_body(payload) {
        Ok(patch) => patch,
        Err(response) => return response,
    };

    match state
        .task_service
        .update(&session, &TaskId::new(id), patch)
        .await
    {
        Ok(task) => responses::data(StatusCode::OK, task),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    AuthSession(session): AuthSession,
    Path(id): Path<String>,
) -> Response {
    match state.task_service.delete(&session, &TaskId::new(id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
