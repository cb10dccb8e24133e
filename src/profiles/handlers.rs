use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{error, info, instrument};

use super::dto::SaveProfileRequest;
use super::repo::{self, Profile, UpsertProfile};
use crate::{
    auth::extractors::{AdminSession, Session},
    auth::provider::is_valid_email,
    fetch::soften,
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(save_profile))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/users/:email", delete(delete_user))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    Session(user): Session,
) -> Result<Json<Option<Profile>>, (StatusCode, String)> {
    let profile = soften(
        repo::get_by_email(&state.db, &user.email).await,
        "profile",
    )
    .into_inner();
    Ok(Json(profile))
}

#[instrument(skip(state, payload))]
pub async fn save_profile(
    State(state): State<AppState>,
    Session(user): Session,
    Json(payload): Json<SaveProfileRequest>,
) -> Result<Json<Profile>, (StatusCode, String)> {
    if let Err(msg) = payload.validate() {
        return Err((StatusCode::BAD_REQUEST, msg.to_string()));
    }

    let profile = repo::upsert(
        &state.db,
        UpsertProfile {
            email: &user.email,
            full_name: user.name.as_deref(),
            place: payload.place.trim(),
            date_of_birth: payload.date_of_birth.trim(),
            leetcode_id: payload.leetcode_id.trim(),
        },
    )
    .await
    .map_err(|e| {
        error!(error = %e, email = %user.email, "profile upsert failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    info!(email = %user.email, "profile saved");
    Ok(Json(profile))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
) -> Result<Json<Vec<Profile>>, (StatusCode, String)> {
    let profiles = soften(repo::list(&state.db).await, "profiles").into_inner();
    Ok(Json(profiles))
}

/// Removes the account and everything it owns: submissions, check-ins,
/// profile.
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(email): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    if !is_valid_email(&email) {
        return Err((StatusCode::BAD_REQUEST, "Invalid request.".into()));
    }

    repo::delete_account(&state.db, &email).await.map_err(|e| {
        error!(error = %e, email = %email, "account delete failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    info!(email = %email, admin = %admin.email, "account deleted");
    Ok(StatusCode::NO_CONTENT)
}
