use serde::Deserialize;
use validator::Validate;

/// Query string of `GET /jobs`.
///
/// `limit` stays textual so a malformed value falls back to the default
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListJobsParams {
    pub limit: Option<String>,
    pub category: Option<String>,
}

/// Body of `POST /jobs/save-status`
#[derive(Debug, Deserialize, Validate)]
pub struct SaveStatusRequest {
    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 job ids are required"))]
    pub ids: Vec<i64>,
}
