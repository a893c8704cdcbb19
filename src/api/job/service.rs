use std::collections::BTreeMap;
use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use futures_util::future::join_all;
use sqlx::{Pool, Postgres};
use tracing::{error, info, warn};

use crate::api::validation::ErrorResponse;
use crate::db::listing::ListingQuery;
use crate::db::{JobRepository, SaveOutcome, SavedJobRepository};
use crate::filters::Category;
use crate::model::{FilterOptions, JobListing};

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Database operation failed; details are logged, never returned
    DatabaseError(sqlx::Error),

    /// The requested resource does not exist
    NotFound(String),

    /// No authenticated viewer on a route that needs one
    Unauthorized,

    /// The request conflicts with existing state
    Conflict(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ServiceError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServiceError::Unauthorized => write!(f, "Authentication required"),
            ServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::DatabaseError(e)
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ServiceError::DatabaseError(e) => {
                error!("Database error: {:?}", e);
                "Internal Server Error".to_string()
            }
            ServiceError::NotFound(msg) => {
                warn!("Not found: {}", msg);
                msg.clone()
            }
            ServiceError::Unauthorized => "Authentication required".to_string(),
            ServiceError::Conflict(msg) => {
                warn!("Conflict: {}", msg);
                msg.clone()
            }
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(message))
    }
}

/// Job board service: listing, counts, filter options, saved jobs
///
/// Every operation checks out one pooled connection and returns it when the
/// guard drops, on success and failure alike.
pub struct JobService {
    pool: Pool<Postgres>,
}

impl JobService {
    /// Create a new JobService instance
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Approved jobs for the listing page
    ///
    /// # Returns
    /// - `Ok(jobs)` - newest first, deduplicated, tags and labels attached
    /// - `Err(ServiceError)` - query failed
    pub async fn list_jobs(&self, query: &ListingQuery) -> Result<Vec<JobListing>, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        let jobs = JobRepository::list(&mut conn, query).await?;
        info!(
            "Service: Listed {} jobs (category={:?}, limit={})",
            jobs.len(),
            query.category.map(Category::id),
            query.limit
        );
        Ok(jobs)
    }

    pub async fn job_detail(&self, id: i64) -> Result<JobListing, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        JobRepository::find_approved(&mut conn, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Job not found".to_string()))
    }

    /// Approved-job count for every known category
    ///
    /// Categories are counted concurrently and independently: a failure is
    /// logged and recorded as `0` without affecting the others.
    pub async fn category_counts(&self) -> BTreeMap<&'static str, i64> {
        let results = join_all(Category::ALL.into_iter().map(|category| async move {
            match self.count_category(category).await {
                Ok(count) => (category.id(), count),
                Err(e) => {
                    error!("Service: Counting category {} failed: {:?}", category.id(), e);
                    (category.id(), 0)
                }
            }
        }))
        .await;

        results.into_iter().collect()
    }

    async fn count_category(&self, category: Category) -> Result<i64, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        JobRepository::count_matching(&mut conn, &category.fragment()).await
    }

    /// Distinct cities, titles and tags present on approved jobs
    ///
    /// Tag lookup failures degrade to an empty tag list.
    pub async fn filter_options(&self) -> Result<FilterOptions, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        let mut options = JobRepository::filter_options(&mut conn).await?;

        match JobRepository::approved_tag_names(&mut conn).await {
            Ok(tags) => options.tags = tags,
            Err(e) => warn!("Service: Fetching tag options failed, returning none: {:?}", e),
        }
        Ok(options)
    }

    pub async fn is_saved(&self, user_id: i64, job_id: i64) -> Result<bool, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        Ok(SavedJobRepository::is_saved(&mut conn, user_id, job_id).await?)
    }

    /// Saved flag for each requested id; ids the user has not saved map to `false`
    pub async fn saved_statuses(
        &self,
        user_id: i64,
        job_ids: &[i64],
    ) -> Result<BTreeMap<i64, bool>, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        let saved = SavedJobRepository::saved_among(&mut conn, user_id, job_ids).await?;

        let mut statuses: BTreeMap<i64, bool> = job_ids.iter().map(|id| (*id, false)).collect();
        for id in saved {
            statuses.insert(id, true);
        }
        Ok(statuses)
    }

    pub async fn save_job(&self, user_id: i64, job_id: i64) -> Result<(), ServiceError> {
        let mut conn = self.pool.acquire().await?;
        match SavedJobRepository::save(&mut conn, user_id, job_id).await? {
            SaveOutcome::Saved => {
                info!("Service: User {} saved job {}", user_id, job_id);
                Ok(())
            }
            SaveOutcome::AlreadySaved => Err(ServiceError::Conflict("Job already saved".to_string())),
            SaveOutcome::JobNotFound => Err(ServiceError::NotFound("Job not found".to_string())),
        }
    }

    pub async fn unsave_job(&self, user_id: i64, job_id: i64) -> Result<(), ServiceError> {
        let mut conn = self.pool.acquire().await?;
        if SavedJobRepository::unsave(&mut conn, user_id, job_id).await? {
            info!("Service: User {} removed saved job {}", user_id, job_id);
            Ok(())
        } else {
            Err(ServiceError::NotFound("Saved job not found".to_string()))
        }
    }
}
