use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::dto::{normalize, CreateSubmissionRequest, ReviewRequest};
use super::repo::{self, Submission, SubmissionPage};
use super::services::{create_with_image, UploadImage};
use super::workflow::{apply_review, has_answer, ReviewError, Status};
use crate::{
    auth::extractors::{AdminSession, Session},
    fetch::soften,
    state::AppState,
};

pub fn submission_routes() -> Router<AppState> {
    Router::new()
        .route("/submissions", get(list_own).post(create_submission))
        .route(
            "/submissions/upload",
            post(create_submission_multipart).layer(DefaultBodyLimit::max(20 * 1024 * 1024)),
        )
        .route("/submissions/:id", delete(delete_submission))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/submissions", get(list_page))
        .route("/admin/submissions/:id/review", post(review_submission))
}

#[instrument(skip(state))]
pub async fn list_own(
    State(state): State<AppState>,
    Session(user): Session,
) -> Result<Json<Vec<Submission>>, (StatusCode, String)> {
    let submissions = soften(
        repo::list_by_email(&state.db, &user.email).await,
        "submissions",
    )
    .into_inner();
    Ok(Json(submissions))
}

#[instrument(skip(state, payload))]
pub async fn create_submission(
    State(state): State<AppState>,
    Session(user): Session,
    Json(payload): Json<CreateSubmissionRequest>,
) -> Result<(StatusCode, Json<Submission>), (StatusCode, String)> {
    let answer_url = normalize(payload.answer_url);
    let answer_text = normalize(payload.answer_text);
    let answer_image_url = normalize(payload.answer_image_url);

    if !has_answer(
        answer_url.as_deref(),
        answer_text.as_deref(),
        answer_image_url.as_deref(),
    ) {
        return Err((StatusCode::BAD_REQUEST, "Provide an answer or link.".into()));
    }

    let submission = repo::create(
        &state.db,
        repo::NewSubmission {
            email: &user.email,
            user_name: user.name.as_deref(),
            task_id: payload.task_id,
            answer_url: answer_url.as_deref(),
            answer_text: answer_text.as_deref(),
            answer_image_url: answer_image_url.as_deref(),
        },
    )
    .await
    .map_err(|e| {
        error!(error = %e, email = %user.email, "submission insert failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    info!(submission_id = %submission.id, email = %user.email, "submission created");
    Ok((StatusCode::CREATED, Json(submission)))
}

/// Multipart variant: text fields plus an optional `answer_image` file that
/// goes to blob storage first.
#[instrument(skip(state, mp))]
pub async fn create_submission_multipart(
    State(state): State<AppState>,
    Session(user): Session,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<Submission>), (StatusCode, String)> {
    let mut task_id: Option<Uuid> = None;
    let mut answer_url: Option<String> = None;
    let mut answer_text: Option<String> = None;
    let mut image: Option<UploadImage> = None;

    while let Ok(Some(field)) = mp.next_field().await {
        match field.name().map(|s| s.to_string()).as_deref() {
            Some("task_id") => {
                let raw = field.text().await.map_err(bad_multipart)?;
                if !raw.trim().is_empty() {
                    task_id = Some(
                        raw.trim()
                            .parse::<Uuid>()
                            .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid task id".into()))?,
                    );
                }
            }
            Some("answer_url") => {
                answer_url = normalize(Some(field.text().await.map_err(bad_multipart)?));
            }
            Some("answer_text") => {
                answer_text = normalize(Some(field.text().await.map_err(bad_multipart)?));
            }
            Some("answer_image") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "image/png".into());
                let body: Bytes = field.bytes().await.map_err(bad_multipart)?;
                if !body.is_empty() {
                    image = Some(UploadImage {
                        filename,
                        content_type,
                        body,
                    });
                }
            }
            _ => {}
        }
    }

    let image_present = image.is_some();
    if !has_answer(answer_url.as_deref(), answer_text.as_deref(), None) && !image_present {
        return Err((StatusCode::BAD_REQUEST, "Provide an answer or link.".into()));
    }

    let submission = create_with_image(&state, &user, task_id, answer_url, answer_text, image)
        .await
        .map_err(|e| {
            error!(error = %e, email = %user.email, "submission upload failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    info!(submission_id = %submission.id, email = %user.email, image = image_present, "submission created");
    Ok((StatusCode::CREATED, Json(submission)))
}

#[instrument(skip(state))]
pub async fn delete_submission(
    State(state): State<AppState>,
    Session(user): Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let deleted = repo::delete_if_pending(&state.db, id, &user.email)
        .await
        .map_err(|e| {
            error!(error = %e, submission_id = %id, "submission delete failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    if !deleted {
        // Not the owner's, already reviewed, or gone.
        return Err((
            StatusCode::CONFLICT,
            "Only your own pending submissions can be deleted.".into(),
        ));
    }

    info!(submission_id = %id, email = %user.email, "submission deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}
fn default_page() -> i64 {
    1
}
fn default_page_size() -> i64 {
    10
}

#[instrument(skip(state))]
pub async fn list_page(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
    Query(q): Query<PageQuery>,
) -> Result<Json<SubmissionPage>, (StatusCode, String)> {
    let page_size = q.page_size.clamp(1, 100);
    let page = match repo::list_page(&state.db, q.page, page_size).await {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "submission page degraded to empty");
            SubmissionPage {
                submissions: Vec::new(),
                meta: repo::page_meta(0, q.page, page_size),
            }
        }
    };
    Ok(Json(page))
}

#[instrument(skip(state, payload))]
pub async fn review_submission(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<Submission>, (StatusCode, String)> {
    let current = repo::get_status(&state.db, id)
        .await
        .map_err(|e| {
            error!(error = %e, submission_id = %id, "status lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .and_then(|s| Status::parse(&s))
        .ok_or_else(|| review_rejection(ReviewError::NotFound))?;

    let next = apply_review(current, payload.status).map_err(review_rejection)?;

    let remark = normalize(payload.remark);
    let updated = repo::review_if_pending(&state.db, id, next, remark.as_deref())
        .await
        .map_err(|e| {
            error!(error = %e, submission_id = %id, "review update failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        // Lost the race with another reviewer between the status read and the
        // guarded update.
        .ok_or((
            StatusCode::CONFLICT,
            "submission already reviewed".to_string(),
        ))?;

    info!(submission_id = %id, status = %updated.status, admin = %admin.email, "submission reviewed");
    Ok(Json(updated))
}

fn bad_multipart<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

fn review_rejection(e: ReviewError) -> (StatusCode, String) {
    match e {
        ReviewError::AlreadyReviewed => (StatusCode::CONFLICT, e.to_string()),
        ReviewError::NotFound => (StatusCode::NOT_FOUND, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_defaults() {
        let q: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, 10);
    }

    #[test]
    fn degraded_page_shape() {
        let _page = SubmissionPage {
            submissions: Vec::new(),
            meta: repo::page_meta(0, 3, 10),
        };
        let json = serde_json::to_string(&_page).unwrap();
        assert!(json.contains(r#""submissions":[]"#));
        assert!(json.contains(r#""total_pages":1"#));
    }
}
