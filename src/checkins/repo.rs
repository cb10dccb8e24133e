use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Append-only attendance record, one logical row per (email, day).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Checkin {
    pub id: Uuid,
    pub email: String,
    pub checkin_date: Date,
    pub created_at: OffsetDateTime,
}

pub async fn list_by_email(db: &PgPool, email: &str) -> anyhow::Result<Vec<Checkin>> {
    let rows = sqlx::query_as::<_, Checkin>(
        r#"
        SELECT id, email, checkin_date, created_at
        FROM checkins
        WHERE email = $1
        ORDER BY checkin_date DESC
        "#,
    )
    .bind(email)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Admission for today's check-in. The unique (email, checkin_date)
/// constraint makes this safe under concurrent dashboard loads; the second
/// writer's insert is a no-op. Returns whether a row was created.
pub async fn ensure_for_date(db: &PgPool, email: &str, date: Date) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO checkins (email, checkin_date)
        VALUES ($1, $2)
        ON CONFLICT (email, checkin_date) DO NOTHING
        "#,
    )
    .bind(email)
    .bind(date)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// All check-ins on or after `since`, across users; analytics input.
pub async fn list_since(db: &PgPool, since: Date) -> anyhow::Result<Vec<Checkin>> {
    let rows = sqlx::query_as::<_, Checkin>(
        r#"
        SELECT id, email, checkin_date, created_at
        FROM checkins
        WHERE checkin_date >= $1
        "#,
    )
    .bind(since)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
