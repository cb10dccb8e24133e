use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{error, info, instrument};

use super::repo::{self, Checkin};
use super::streak::{badges, streak_days, Badge};
use crate::{auth::extractors::Session, fetch::soften, state::AppState};

pub fn checkin_routes() -> Router<AppState> {
    Router::new().route("/checkins", get(list_checkins).post(check_in))
}

#[derive(Debug, Serialize)]
pub struct CheckinSummary {
    pub checkins: Vec<Checkin>,
    pub streak_days: u32,
    pub badges: Vec<Badge>,
}

pub fn summarize(checkins: Vec<Checkin>, today: time::Date) -> CheckinSummary {
    let dates: Vec<time::Date> = checkins.iter().map(|c| c.checkin_date).collect();
    let streak = streak_days(&dates, today);
    CheckinSummary {
        checkins,
        streak_days: streak,
        badges: badges(streak),
    }
}

#[instrument(skip(state))]
pub async fn list_checkins(
    State(state): State<AppState>,
    Session(user): Session,
) -> Result<Json<CheckinSummary>, (StatusCode, String)> {
    let today = OffsetDateTime::now_utc().date();
    let checkins = soften(
        repo::list_by_email(&state.db, &user.email).await,
        "checkins",
    )
    .into_inner();
    Ok(Json(summarize(checkins, today)))
}

/// Explicit check-in; the dashboard also performs this on load.
#[instrument(skip(state))]
pub async fn check_in(
    State(state): State<AppState>,
    Session(user): Session,
) -> Result<Json<CheckinSummary>, (StatusCode, String)> {
    let today = OffsetDateTime::now_utc().date();
    let created = repo::ensure_for_date(&state.db, &user.email, today)
        .await
        .map_err(|e| {
            error!(error = %e, email = %user.email, "check-in failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    if created {
        info!(email = %user.email, date = %today, "checked in");
    }

    let checkins = soften(
        repo::list_by_email(&state.db, &user.email).await,
        "checkins",
    )
    .into_inner();
    Ok(Json(summarize(checkins, today)))
}
