use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tracing::instrument;

use super::service::{compute, AnalyticsSnapshot};
use crate::{
    auth::extractors::AdminSession,
    checkins::repo as checkins_repo,
    fetch::soften,
    leetcode::LeetCodeStats,
    profiles::repo as profiles_repo,
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/analytics", get(get_analytics))
        .route("/admin/leaderboard", get(get_leaderboard))
}

/// Re-derives every number from the store on each call; nothing is cached
/// or persisted.
#[instrument(skip(state))]
pub async fn get_analytics(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
) -> Result<Json<AnalyticsSnapshot>, (StatusCode, String)> {
    let today = OffsetDateTime::now_utc().date();
    let window_start = today - Duration::days(6);
    let previous_start = today - Duration::days(13);

    let total_profiles = soften(profiles_repo::count(&state.db).await, "profile count")
        .into_inner()
        .max(0) as usize;

    let recent = soften(
        checkins_repo::list_since(&state.db, window_start).await,
        "recent checkins",
    )
    .into_inner();
    let previous = soften(
        checkins_repo::list_since(&state.db, previous_start).await,
        "previous checkins",
    )
    .into_inner();
    let recent_submissions = soften(
        crate::submissions::repo::list_since(&state.db, window_start.midnight().assume_utc())
            .await,
        "recent submissions",
    )
    .into_inner();

    let recent_pairs: Vec<(String, time::Date)> = recent
        .into_iter()
        .map(|c| (c.email, c.checkin_date))
        .collect();
    let previous_pairs: Vec<(String, time::Date)> = previous
        .into_iter()
        .map(|c| (c.email, c.checkin_date))
        .collect();
    let submitters: Vec<String> = recent_submissions.into_iter().map(|s| s.email).collect();

    Ok(Json(compute(
        today,
        total_profiles,
        &recent_pairs,
        &previous_pairs,
        &submitters,
    )))
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub email: String,
    pub name: String,
    pub leetcode_id: String,
    pub stats: Option<LeetCodeStats>,
}

/// External stats for up to 8 profiles with a configured handle. Each fetch
/// is best effort; a missing result renders as "no stats", never an error.
#[instrument(skip(state))]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
) -> Result<Json<Vec<LeaderboardEntry>>, (StatusCode, String)> {
    let profiles = soften(profiles_repo::list(&state.db).await, "profiles").into_inner();

    let mut entries = Vec::new();
    for profile in profiles
        .into_iter()
        .filter(|p| p.leetcode_id.is_some())
        .take(8)
    {
        let leetcode_id = profile.leetcode_id.unwrap_or_default();
        let stats = state.stats.fetch_stats(&leetcode_id).await.ok();
        entries.push(LeaderboardEntry {
            email: profile.email.clone(),
            name: profile.full_name.unwrap_or(profile.email),
            leetcode_id,
            stats,
        });
    }

    Ok(Json(entries))
}
