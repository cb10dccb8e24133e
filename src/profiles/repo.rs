use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// One record per user email; personal fields plus the external
/// coding-practice handle.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub place: Option<String>,
    pub date_of_birth: Option<String>,
    pub leetcode_id: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

const PROFILE_COLUMNS: &str =
    "id, email, full_name, place, date_of_birth, leetcode_id, created_at, updated_at";

pub async fn get_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(&format!(
        r#"
        SELECT {PROFILE_COLUMNS}
        FROM profiles
        WHERE email = $1
        "#,
    ))
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(profile)
}

pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Profile>> {
    let rows = sqlx::query_as::<_, Profile>(&format!(
        r#"
        SELECT {PROFILE_COLUMNS}
        FROM profiles
        ORDER BY created_at DESC
        "#,
    ))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn count(db: &PgPool) -> anyhow::Result<i64> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles")
        .fetch_one(db)
        .await?;
    Ok(total)
}

pub struct UpsertProfile<'a> {
    pub email: &'a str,
    pub full_name: Option<&'a str>,
    pub place: &'a str,
    pub date_of_birth: &'a str,
    pub leetcode_id: &'a str,
}

/// Insert-or-update keyed on email; the owner can re-save freely.
pub async fn upsert(db: &PgPool, input: UpsertProfile<'_>) -> anyhow::Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(&format!(
        r#"
        INSERT INTO profiles (email, full_name, place, date_of_birth, leetcode_id)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET
            full_name = EXCLUDED.full_name,
            place = EXCLUDED.place,
            date_of_birth = EXCLUDED.date_of_birth,
            leetcode_id = EXCLUDED.leetcode_id,
            updated_at = now()
        RETURNING {PROFILE_COLUMNS}
        "#,
    ))
    .bind(input.email)
    .bind(input.full_name)
    .bind(input.place)
    .bind(input.date_of_birth)
    .bind(input.leetcode_id)
    .fetch_one(db)
    .await?;
    Ok(profile)
}

/// Admin account removal: submissions, check-ins and the profile go together
/// in a single transaction.
pub async fn delete_account(db: &PgPool, email: &str) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM submissions WHERE email = $1")
        .bind(email)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM checkins WHERE email = $1")
        .bind(email)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM profiles WHERE email = $1")
        .bind(email)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkins::repo as checkins_repo;
    use crate::submissions::repo::{self as submissions_repo, NewSubmission};
    use time::OffsetDateTime;

    #[sqlx::test]
    async fn delete_account_removes_everything_the_user_owns(db: PgPool) {
        let email = "leaving@example.com";
        let keeper = "staying@example.com";

        for who in [email, keeper] {
            upsert(
                &db,
                UpsertProfile {
                    email: who,
                    full_name: Some("Intern"),
                    place: "Bengaluru",
                    date_of_birth: "2003-06-15",
                    leetcode_id: "intern_handle",
                },
            )
            .await
            .expect("profile upsert");

            checkins_repo::ensure_for_date(&db, who, OffsetDateTime::now_utc().date())
                .await
                .expect("check-in");

            submissions_repo::create(
                &db,
                NewSubmission {
                    email: who,
                    user_name: None,
                    task_id: None,
                    answer_url: None,
                    answer_text: Some("two pointers"),
                    answer_image_url: None,
                },
            )
            .await
            .expect("submission");
        }

        delete_account(&db, email).await.expect("cascade delete");

        assert!(get_by_email(&db, email).await.unwrap().is_none());
        assert!(checkins_repo::list_by_email(&db, email)
            .await
            .unwrap()
            .is_empty());
        assert!(submissions_repo::list_by_email(&db, email)
            .await
            .unwrap()
            .is_empty());

        // Other accounts are untouched.
        assert!(get_by_email(&db, keeper).await.unwrap().is_some());
        assert_eq!(
            checkins_repo::list_by_email(&db, keeper).await.unwrap().len(),
            1
        );
        assert_eq!(
            submissions_repo::list_by_email(&db, keeper)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
