use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::dto::CreateTaskRequest;
use super::repo::{self, NewTask, Task};
use crate::{
    auth::extractors::{AdminSession, Session},
    fetch::soften,
    state::AppState,
};

pub fn task_routes() -> Router<AppState> {
    Router::new().route("/tasks", get(list_tasks))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/tasks", post(create_task))
        .route("/admin/tasks/:id", delete(delete_task))
}

#[instrument(skip(state))]
pub async fn list_tasks(
    State(state): State<AppState>,
    Session(_user): Session,
) -> Result<Json<Vec<Task>>, (StatusCode, String)> {
    let tasks = soften(repo::list(&state.db).await, "tasks").into_inner();
    Ok(Json(tasks))
}

#[instrument(skip(state, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), (StatusCode, String)> {
    if let Err(msg) = payload.validate() {
        return Err((StatusCode::BAD_REQUEST, msg.to_string()));
    }

    let task = repo::create(
        &state.db,
        NewTask {
            title: payload.title.trim(),
            deadline: payload.deadline.trim(),
            problem: payload.problem.trim(),
            hints: payload.hints.trim(),
            attachment_url: payload.attachment_url.as_deref().filter(|s| !s.is_empty()),
            attachment_name: payload.attachment_name.as_deref().filter(|s| !s.is_empty()),
        },
    )
    .await
    .map_err(|e| {
        error!(error = %e, "task create failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    info!(task_id = %task.id, admin = %admin.email, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let deleted = repo::delete_by_id(&state.db, id).await.map_err(|e| {
        error!(error = %e, task_id = %id, "task delete failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Task not found".into()));
    }

    info!(task_id = %id, admin = %admin.email, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}
