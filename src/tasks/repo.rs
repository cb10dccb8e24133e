use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Admin-authored assignment. Created and deleted, never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub deadline: String,
    pub problem: String,
    pub hints: String,
    pub attachment_url: Option<String>,
    pub attachment_name: Option<String>,
    pub created_at: OffsetDateTime,
}

const TASK_COLUMNS: &str =
    "id, title, deadline, problem, hints, attachment_url, attachment_name, created_at";

pub struct NewTask<'a> {
    pub title: &'a str,
    pub deadline: &'a str,
    pub problem: &'a str,
    pub hints: &'a str,
    pub attachment_url: Option<&'a str>,
    pub attachment_name: Option<&'a str>,
}

pub async fn create(db: &PgPool, input: NewTask<'_>) -> anyhow::Result<Task> {
    let task = sqlx::query_as::<_, Task>(&format!(
        r#"
        INSERT INTO tasks (title, deadline, problem, hints, attachment_url, attachment_name)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {TASK_COLUMNS}
        "#,
    ))
    .bind(input.title)
    .bind(input.deadline)
    .bind(input.problem)
    .bind(input.hints)
    .bind(input.attachment_url)
    .bind(input.attachment_name)
    .fetch_one(db)
    .await?;
    Ok(task)
}

pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Task>> {
    let rows = sqlx::query_as::<_, Task>(&format!(
        r#"
        SELECT {TASK_COLUMNS}
        FROM tasks
        ORDER BY created_at DESC
        "#,
    ))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn delete_by_id(db: &PgPool, task_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(task_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
