use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{FilterOptions, JobListing};

/// Response of `GET /jobs`
#[derive(Serialize)]
pub struct JobListResponse {
    pub ok: bool,
    pub jobs: Vec<JobListing>,
}

/// Response of `GET /jobs/{id}`
#[derive(Serialize)]
pub struct JobDetailResponse {
    pub ok: bool,
    pub job: JobListing,
}

/// Response of `GET /jobs/category-counts`; one entry per known category
#[derive(Serialize)]
pub struct CategoryCountsResponse {
    pub ok: bool,
    pub counts: BTreeMap<&'static str, i64>,
}

/// Response of `GET /jobs/filters`
#[derive(Serialize)]
pub struct FilterOptionsResponse {
    pub ok: bool,
    pub filters: FilterOptions,
}

/// Response of `GET /jobs/save/{job_id}`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedStatusResponse {
    pub ok: bool,
    pub is_saved: bool,
}

/// Response of `POST /jobs/save-status`
#[derive(Serialize)]
pub struct SaveStatusBatchResponse {
    pub ok: bool,
    pub statuses: BTreeMap<i64, bool>,
}

/// Acknowledgement for save/unsave
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveJobResponse {
    pub ok: bool,
    pub message: String,
    pub job_id: i64,
}
