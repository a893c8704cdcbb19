use std::collections::HashMap;

use sqlx::PgConnection;
use tracing::debug;

use crate::db::listing::{count_query, ListingQuery};
use crate::db::models::{JobRow, JobTagRow, JOB_COLUMNS};
use crate::filters::FilterFragment;
use crate::model::{FilterOptions, JobListing, JobStatus};

/// Repository for job reads and the expiration sweep
pub struct JobRepository;

impl JobRepository {
    /// Approved jobs matching the listing query, newest first, with tags attached
    pub async fn list(
        conn: &mut PgConnection,
        query: &ListingQuery,
    ) -> Result<Vec<JobListing>, sqlx::Error> {
        let rendered = query.render();
        debug!(
            "Listing jobs: limit={}, category={:?}, viewer={:?}, params={}",
            query.limit,
            query.category,
            query.viewer,
            rendered.params.len()
        );

        let rows: Vec<JobRow> = rendered.query_as().fetch_all(&mut *conn).await?;
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut tags = Self::tags_for_jobs(conn, &ids).await?;

        debug!("Listing returned {} jobs", rows.len());
        Ok(rows
            .into_iter()
            .map(|row| {
                let job_tags = tags.remove(&row.id).unwrap_or_default();
                row.into_listing(job_tags)
            })
            .collect())
    }

    /// Tag names for a batch of jobs in one query, keyed by job id.
    ///
    /// Jobs without tags are simply absent from the map.
    pub async fn tags_for_jobs(
        conn: &mut PgConnection,
        job_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<String>>, sqlx::Error> {
        if job_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, JobTagRow>(
            r#"
            SELECT jtm.job_id, jt.name
            FROM job_tag_map jtm
            INNER JOIN job_tags jt ON jt.id = jtm.tag_id
            WHERE jtm.job_id = ANY($1)
            ORDER BY jtm.job_id, jt.name
            "#,
        )
        .bind(job_ids)
        .fetch_all(&mut *conn)
        .await?;

        Ok(group_tags(rows))
    }

    /// Number of distinct approved jobs matching a fragment
    pub async fn count_matching(
        conn: &mut PgConnection,
        fragment: &FilterFragment,
    ) -> Result<i64, sqlx::Error> {
        let rendered = count_query(fragment);
        let (count,): (i64,) = rendered.query_as().fetch_one(&mut *conn).await?;
        Ok(count)
    }

    /// A single approved job with its tags
    pub async fn find_approved(
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<JobListing>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM jobs WHERE id = $1 AND status = $2",
            JOB_COLUMNS.join(", ")
        );
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .bind(JobStatus::Approved.as_str())
            .fetch_optional(&mut *conn)
            .await?;

        let Some(row) = row else {
            debug!("Job {} not found or not approved", id);
            return Ok(None);
        };

        let mut tags = Self::tags_for_jobs(conn, &[row.id]).await?;
        let job_tags = tags.remove(&row.id).unwrap_or_default();
        Ok(Some(row.into_listing(job_tags)))
    }

    /// Whether any job (in any state) exists with this id
    pub async fn exists(conn: &mut PgConnection, id: i64) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM jobs WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(exists)
    }

    /// Distinct cities and titles of approved jobs, sorted ascending
    pub async fn filter_options(conn: &mut PgConnection) -> Result<FilterOptions, sqlx::Error> {
        let cities: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT city
            FROM jobs
            WHERE status = $1 AND city IS NOT NULL AND city <> ''
            ORDER BY city ASC
            "#,
        )
        .bind(JobStatus::Approved.as_str())
        .fetch_all(&mut *conn)
        .await?;

        let titles: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT title
            FROM jobs
            WHERE status = $1 AND title IS NOT NULL AND title <> ''
            ORDER BY title ASC
            "#,
        )
        .bind(JobStatus::Approved.as_str())
        .fetch_all(&mut *conn)
        .await?;

        Ok(FilterOptions {
            cities,
            titles,
            tags: Vec::new(),
        })
    }

    /// Distinct tag names attached to approved jobs, sorted ascending
    pub async fn approved_tag_names(conn: &mut PgConnection) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT DISTINCT jt.name
            FROM job_tags jt
            INNER JOIN job_tag_map jtm ON jt.id = jtm.tag_id
            INNER JOIN jobs j ON jtm.job_id = j.id
            WHERE j.status = $1 AND jt.name IS NOT NULL AND jt.name <> ''
            ORDER BY jt.name ASC
            "#,
        )
        .bind(JobStatus::Approved.as_str())
        .fetch_all(&mut *conn)
        .await
    }

    /// Close approved jobs whose expiry has passed.
    /// Returns the number of jobs closed.
    pub async fn close_expired(conn: &mut PgConnection) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET status = $1, updated_at = NOW()
            WHERE status = $2
              AND expires_at IS NOT NULL
              AND expires_at <= NOW()
            "#,
        )
        .bind(JobStatus::Closed.as_str())
        .bind(JobStatus::Approved.as_str())
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }
}

fn group_tags(rows: Vec<JobTagRow>) -> HashMap<i64, Vec<String>> {
    let mut grouped: HashMap<i64, Vec<String>> = HashMap::new();
    for row in rows {
        let tags = grouped.entry(row.job_id).or_default();
        // a tag listed twice for the same job is still one tag
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(&row.name)) {
            tags.push(row.name);
        }
    }
    grouped
}
