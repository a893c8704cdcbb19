use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use futures_util::future::{join, join_all};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::viewer::VIEWER_HEADER;
use crate::model::{FilterOptions, JobListing};
use crate::sync::{FilterSynchronizer, NavigationTicket};

const JOBS_ENDPOINT: &str = "jobs";
const FILTERS_ENDPOINT: &str = "jobs/filters";
const SAVE_STATUS_ENDPOINT: &str = "jobs/save-status";

/// The browse page pulls one large page and filters locally
pub const BROWSE_LIMIT: u32 = 100;

/// Largest id batch `POST /jobs/save-status` accepts
const SAVE_STATUS_BATCH: usize = 100;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug)]
pub enum ClientError {
    /// Building the client or a request URL failed
    Setup(String),

    /// Transport failure or undecodable body
    Http(reqwest::Error),

    /// The server answered with a non-success status
    Status(StatusCode),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Setup(msg) => write!(f, "Client setup failed: {}", msg),
            ClientError::Http(e) => write!(f, "HTTP request failed: {}", e),
            ClientError::Status(status) => write!(f, "Server returned {}", status),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e)
    }
}

#[derive(Deserialize)]
struct JobsBody {
    jobs: Vec<JobListing>,
}

#[derive(Deserialize)]
struct FiltersBody {
    filters: FilterOptions,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedBody {
    is_saved: bool,
}

#[derive(Deserialize)]
struct SaveStatusBody {
    statuses: HashMap<i64, bool>,
}

/// HTTP client for the browse page endpoints
#[derive(Debug, Clone)]
pub struct JobBoardClient {
    client: reqwest::Client,
    base_url: Url,
    viewer: Option<i64>,
}

impl JobBoardClient {
    /// `base_url` is the service root, e.g. `http://127.0.0.1:8080/`
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url).map_err(|e| ClientError::Setup(e.to_string()))?;
        // relative joins replace the last segment otherwise
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            viewer: None,
        })
    }

    /// Act on behalf of an authenticated viewer
    pub fn with_viewer(mut self, viewer: i64) -> Self {
        self.viewer = Some(viewer);
        self
    }

    pub fn viewer(&self) -> Option<i64> {
        self.viewer
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Setup(e.to_string()))
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match self.viewer {
            Some(viewer) => request.header(VIEWER_HEADER, viewer.to_string()),
            None => request,
        }
    }

    pub async fn fetch_jobs(&self, category: Option<&str>, limit: u32) -> Result<Vec<JobListing>, ClientError> {
        let mut url = self.endpoint(JOBS_ENDPOINT)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &limit.to_string());
            if let Some(category) = category {
                query.append_pair("category", category);
            }
        }

        debug!("Fetching jobs: {}", url);
        let response = self.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        let body: JobsBody = response.json().await?;
        Ok(body.jobs)
    }

    /// Distinct cities/titles/tags; any failure yields empty lists
    pub async fn fetch_filter_options(&self) -> FilterOptions {
        match self.try_fetch_filter_options().await {
            Ok(options) => options,
            Err(e) => {
                warn!("Filter options unavailable, continuing without them: {}", e);
                FilterOptions::default()
            }
        }
    }

    async fn try_fetch_filter_options(&self) -> Result<FilterOptions, ClientError> {
        let response = self.get(self.endpoint(FILTERS_ENDPOINT)?).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        let body: FiltersBody = response.json().await?;
        Ok(body.filters)
    }

    /// Saved flag for each id. Uses the batch endpoint when the server has it,
    /// otherwise one concurrent request per job. Any failure reads as not saved.
    pub async fn fetch_saved_status(&self, ids: &[i64]) -> HashMap<i64, bool> {
        if self.viewer.is_none() || ids.is_empty() {
            return ids.iter().map(|&id| (id, false)).collect();
        }

        match self.saved_status_batch(ids).await {
            Ok(statuses) => return statuses,
            Err(e) => debug!("Batch saved-status lookup failed, falling back to per-job: {}", e),
        }

        let checks = ids.iter().map(|&id| async move {
            match self.saved_status_one(id).await {
                Ok(saved) => (id, saved),
                Err(e) => {
                    warn!("Saved status for job {} unavailable: {}", id, e);
                    (id, false)
                }
            }
        });
        join_all(checks).await.into_iter().collect()
    }

    async fn saved_status_batch(&self, ids: &[i64]) -> Result<HashMap<i64, bool>, ClientError> {
        let url = self.endpoint(SAVE_STATUS_ENDPOINT)?;
        let mut statuses: HashMap<i64, bool> = HashMap::with_capacity(ids.len());

        for chunk in ids.chunks(SAVE_STATUS_BATCH) {
            let mut request = self
                .client
                .post(url.clone())
                .json(&serde_json::json!({ "ids": chunk }));
            if let Some(viewer) = self.viewer {
                request = request.header(VIEWER_HEADER, viewer.to_string());
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(ClientError::Status(response.status()));
            }
            let body: SaveStatusBody = response.json().await?;
            statuses.extend(body.statuses);
        }

        for &id in ids {
            statuses.entry(id).or_insert(false);
        }
        Ok(statuses)
    }

    async fn saved_status_one(&self, job_id: i64) -> Result<bool, ClientError> {
        let url = self.endpoint(&format!("jobs/save/{}", job_id))?;
        let response = self.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        let body: SavedBody = response.json().await?;
        Ok(body.is_saved)
    }

    /// Drive one navigation end to end: update the synchronizer, load options
    /// and jobs concurrently, then saved flags. Results that arrive after a newer
    /// navigation are dropped by the synchronizer; the lock is never held across
    /// a request.
    pub async fn load_for_navigation(
        &self,
        sync: &Mutex<FilterSynchronizer>,
        url: Url,
    ) -> Result<NavigationTicket, ClientError> {
        let ticket = sync.lock().await.navigate(url);

        let (options, jobs) = join(self.fetch_filter_options(), self.fetch_jobs(None, BROWSE_LIMIT)).await;

        let ids: Vec<i64> = {
            let mut state = sync.lock().await;
            if !state.set_filter_options(ticket, options) {
                return Ok(ticket);
            }
            let jobs = jobs?;
            let ids = jobs.iter().map(|job| job.id).collect();
            state.set_jobs(ticket, jobs);
            ids
        };
        info!("Loaded {} jobs for browse page", ids.len());

        if self.viewer.is_some() {
            let statuses = self.fetch_saved_status(&ids).await;
            sync.lock().await.set_saved_status(ticket, statuses);
        }
        Ok(ticket)
    }
}
