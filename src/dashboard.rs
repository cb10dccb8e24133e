use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::Session,
    checkins::handlers::{summarize, CheckinSummary},
    checkins::repo as checkins_repo,
    drive::DriveFile,
    fetch::soften,
    leetcode::LeetCodeStats,
    profiles::repo::{self as profiles_repo, Profile},
    state::AppState,
    submissions::repo::{self as submissions_repo, Submission},
    tasks::repo::{self as tasks_repo, Task},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/stats/:username", get(get_stats))
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub profile: Option<Profile>,
    pub tasks: Vec<Task>,
    pub materials: Vec<DriveFile>,
    pub attendance: CheckinSummary,
    pub submissions: Vec<Submission>,
    pub leetcode: Option<LeetCodeStats>,
}

/// The daily landing view. Loading it performs check-in admission: if today
/// has no row yet, one is created before the list is read back. Every list
/// on this path degrades to empty rather than failing the whole page.
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Session(user): Session,
) -> Result<Json<DashboardResponse>, (StatusCode, String)> {
    let today = OffsetDateTime::now_utc().date();

    match checkins_repo::ensure_for_date(&state.db, &user.email, today).await {
        Ok(true) => info!(email = %user.email, date = %today, "checked in on dashboard load"),
        Ok(false) => {}
        // Admission is a write, but the dashboard still renders without it.
        Err(e) => warn!(error = %e, email = %user.email, "check-in admission failed"),
    }

    let profile = soften(
        profiles_repo::get_by_email(&state.db, &user.email).await,
        "profile",
    )
    .into_inner();
    let tasks = soften(tasks_repo::list(&state.db).await, "tasks").into_inner();
    let materials = soften(state.drive.list_files().await, "materials").into_inner();
    let checkins = soften(
        checkins_repo::list_by_email(&state.db, &user.email).await,
        "checkins",
    )
    .into_inner();
    let submissions = soften(
        submissions_repo::list_by_email(&state.db, &user.email).await,
        "submissions",
    )
    .into_inner();

    let leetcode = match profile.as_ref().and_then(|p| p.leetcode_id.as_deref()) {
        Some(handle) => state.stats.fetch_stats(handle).await.ok(),
        None => None,
    };

    Ok(Json(DashboardResponse {
        profile,
        tasks,
        materials,
        attendance: summarize(checkins, today),
        submissions,
        leetcode,
    }))
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub username: String,
    pub stats: Option<LeetCodeStats>,
}

/// Best-effort stats proxy; absent data is a null payload, not an error.
#[instrument(skip(state))]
pub async fn get_stats(
    State(state): State<AppState>,
    Session(_user): Session,
    Path(username): Path<String>,
) -> Result<Json<StatsResponse>, (StatusCode, String)> {
    let stats = state.stats.fetch_stats(&username).await.ok();
    Ok(Json(StatsResponse { username, stats }))
}
