use sqlx::PgConnection;
use tracing::debug;

use crate::db::job_repository::JobRepository;

/// Result of saving a job for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
    JobNotFound,
}

/// Repository for the per-user saved-jobs relation
pub struct SavedJobRepository;

impl SavedJobRepository {
    pub async fn is_saved(
        conn: &mut PgConnection,
        user_id: i64,
        job_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let (saved,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM saved_jobs WHERE user_id = $1 AND job_id = $2)",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(saved)
    }

    /// Ids among `job_ids` that the user has saved
    pub async fn saved_among(
        conn: &mut PgConnection,
        user_id: i64,
        job_ids: &[i64],
    ) -> Result<Vec<i64>, sqlx::Error> {
        if job_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_scalar("SELECT job_id FROM saved_jobs WHERE user_id = $1 AND job_id = ANY($2)")
            .bind(user_id)
            .bind(job_ids)
            .fetch_all(&mut *conn)
            .await
    }

    pub async fn save(
        conn: &mut PgConnection,
        user_id: i64,
        job_id: i64,
    ) -> Result<SaveOutcome, sqlx::Error> {
        if !JobRepository::exists(conn, job_id).await? {
            debug!("Save rejected, job {} does not exist", job_id);
            return Ok(SaveOutcome::JobNotFound);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO saved_jobs (user_id, job_id, saved_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, job_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(job_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            Ok(SaveOutcome::AlreadySaved)
        } else {
            debug!("User {} saved job {}", user_id, job_id);
            Ok(SaveOutcome::Saved)
        }
    }

    /// Returns false when nothing was saved for this pair
    pub async fn unsave(
        conn: &mut PgConnection,
        user_id: i64,
        job_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2")
            .bind(user_id)
            .bind(job_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
