use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::workflow::Status;

/// User-authored answer, optionally tied to a task; reviewed by admins.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub email: String,
    pub user_name: Option<String>,
    pub task_id: Option<Uuid>,
    pub answer_url: Option<String>,
    pub answer_text: Option<String>,
    pub answer_image_url: Option<String>,
    pub status: String,
    pub admin_remark: Option<String>,
    pub created_at: OffsetDateTime,
}

const SUBMISSION_COLUMNS: &str = "id, email, user_name, task_id, answer_url, answer_text, \
     answer_image_url, status, admin_remark, created_at";

pub struct NewSubmission<'a> {
    pub email: &'a str,
    pub user_name: Option<&'a str>,
    pub task_id: Option<Uuid>,
    pub answer_url: Option<&'a str>,
    pub answer_text: Option<&'a str>,
    pub answer_image_url: Option<&'a str>,
}

pub async fn create(db: &PgPool, input: NewSubmission<'_>) -> anyhow::Result<Submission> {
    let submission = sqlx::query_as::<_, Submission>(&format!(
        r#"
        INSERT INTO submissions (email, user_name, task_id, answer_url, answer_text, answer_image_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {SUBMISSION_COLUMNS}
        "#,
    ))
    .bind(input.email)
    .bind(input.user_name)
    .bind(input.task_id)
    .bind(input.answer_url)
    .bind(input.answer_text)
    .bind(input.answer_image_url)
    .fetch_one(db)
    .await?;
    Ok(submission)
}

pub async fn list_by_email(db: &PgPool, email: &str) -> anyhow::Result<Vec<Submission>> {
    let rows = sqlx::query_as::<_, Submission>(&format!(
        r#"
        SELECT {SUBMISSION_COLUMNS}
        FROM submissions
        WHERE email = $1
        ORDER BY created_at DESC
        "#,
    ))
    .bind(email)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Page bookkeeping for the admin review table. Pages are 1-based; the page
/// is clamped and total_pages never drops below 1.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PageMeta {
    pub page: i64,
    pub total_pages: i64,
    pub has_prev: bool,
    pub has_next: bool,
}

pub fn page_meta(total: i64, requested_page: i64, page_size: i64) -> PageMeta {
    let page = requested_page.max(1);
    let total_pages = ((total + page_size - 1) / page_size).max(1);
    PageMeta {
        page,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
    }
}

/// Row offset for the page query. The page is clamped to total_pages here so
/// an arbitrarily large requested page cannot overflow the multiplication.
fn page_offset(meta: &PageMeta, page_size: i64) -> i64 {
    (meta.page.min(meta.total_pages) - 1) * page_size
}

#[derive(Debug, Serialize)]
pub struct SubmissionPage {
    pub submissions: Vec<Submission>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

pub async fn list_page(
    db: &PgPool,
    requested_page: i64,
    page_size: i64,
) -> anyhow::Result<SubmissionPage> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM submissions")
        .fetch_one(db)
        .await?;
    let meta = page_meta(total, requested_page, page_size);

    let rows = sqlx::query_as::<_, Submission>(&format!(
        r#"
        SELECT {SUBMISSION_COLUMNS}
        FROM submissions
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    ))
    .bind(page_size)
    .bind(page_offset(&meta, page_size))
    .fetch_all(db)
    .await?;

    Ok(SubmissionPage {
        submissions: rows,
        meta,
    })
}

pub async fn get_status(db: &PgPool, id: Uuid) -> anyhow::Result<Option<String>> {
    let status = sqlx::query_scalar::<_, String>("SELECT status FROM submissions WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(status)
}

/// Guarded transition: only rows still pending are updated, so a concurrent
/// or repeated review cannot overwrite a terminal state. Returns None when
/// no pending row matched.
pub async fn review_if_pending(
    db: &PgPool,
    id: Uuid,
    status: Status,
    remark: Option<&str>,
) -> anyhow::Result<Option<Submission>> {
    let updated = sqlx::query_as::<_, Submission>(&format!(
        r#"
        UPDATE submissions
        SET status = $2, admin_remark = $3
        WHERE id = $1 AND status = 'pending'
        RETURNING {SUBMISSION_COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(status.as_str())
    .bind(remark)
    .fetch_optional(db)
    .await?;
    Ok(updated)
}

/// Owner-only delete, and only while pending.
pub async fn delete_if_pending(db: &PgPool, id: Uuid, email: &str) -> anyhow::Result<bool> {
    let result = sqlx::query(
        "DELETE FROM submissions WHERE id = $1 AND email = $2 AND status = 'pending'",
    )
    .bind(id)
    .bind(email)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Minimal rows for the analytics window: who submitted, when.
#[derive(Debug, Clone, FromRow)]
pub struct SubmitterRow {
    pub email: String,
    pub created_at: OffsetDateTime,
}

pub async fn list_since(db: &PgPool, since: OffsetDateTime) -> anyhow::Result<Vec<SubmitterRow>> {
    let rows = sqlx::query_as::<_, SubmitterRow>(
        r#"
        SELECT email, created_at
        FROM submissions
        WHERE created_at >= $1
        "#,
    )
    .bind(since)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_meta_clamps_and_bounds() {
        let meta = page_meta(0, 0, 10);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_prev);
        assert!(!meta.has_next);

        let meta = page_meta(25, 2, 10);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_prev);
        assert!(meta.has_next);

        let meta = page_meta(25, 3, 10);
        assert!(!meta.has_next);

        // Requests past the end keep the requested page; the row query just
        // comes back empty.
        let meta = page_meta(5, 9, 10);
        assert_eq!(meta.page, 9);
        assert_eq!(meta.total_pages, 1);
        assert!(meta.has_prev);
        assert!(!meta.has_next);
    }

    #[test]
    fn page_offset_stays_in_bounds_for_absurd_pages() {
        // A past-the-end page lands on the last real offset instead of
        // multiplying the raw request.
        let meta = page_meta(5, 9, 10);
        assert_eq!(page_offset(&meta, 10), 0);

        let meta = page_meta(25, i64::MAX, 10);
        assert_eq!(page_offset(&meta, 10), 20);

        let meta = page_meta(25, 2, 10);
        assert_eq!(page_offset(&meta, 10), 10);
    }

    #[test]
    fn exact_multiple_has_no_phantom_page() {
        let meta = page_meta(30, 1, 10);
        assert_eq!(meta.total_pages, 3);
    }
}
