use actix_web::{
    HttpResponse, delete, get, post,
    web::{Data, Path, Query, ServiceConfig, scope},
};
use actix_web_validator::Json;

use super::dto::{
    CategoryCountsResponse, FilterOptionsResponse, JobDetailResponse, JobListResponse,
    SaveJobResponse, SaveStatusBatchResponse, SavedStatusResponse,
};
use super::models::{ListJobsParams, SaveStatusRequest};
use super::service::{JobService, ServiceError};
use crate::api::viewer::Viewer;
use crate::db::listing::{ListingQuery, parse_limit};

#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    params: Query<ListJobsParams>,
    viewer: Option<Viewer>,
) -> Result<HttpResponse, ServiceError> {
    let params = params.into_inner();
    let query = ListingQuery::new(
        Some(parse_limit(params.limit.as_deref())),
        params.category.as_deref(),
        viewer.map(Viewer::id),
    );

    let jobs = service.list_jobs(&query).await?;
    Ok(HttpResponse::Ok().json(JobListResponse { ok: true, jobs }))
}

#[get("/category-counts")]
async fn category_counts(service: Data<JobService>) -> HttpResponse {
    let counts = service.category_counts().await;
    HttpResponse::Ok().json(CategoryCountsResponse { ok: true, counts })
}

#[get("/filters")]
async fn filter_options(service: Data<JobService>) -> Result<HttpResponse, ServiceError> {
    let filters = service.filter_options().await?;
    Ok(HttpResponse::Ok().json(FilterOptionsResponse { ok: true, filters }))
}

#[post("/save-status")]
async fn saved_statuses(
    service: Data<JobService>,
    viewer: Viewer,
    body: Json<SaveStatusRequest>,
) -> Result<HttpResponse, ServiceError> {
    let statuses = service.saved_statuses(viewer.id(), &body.ids).await?;
    Ok(HttpResponse::Ok().json(SaveStatusBatchResponse { ok: true, statuses }))
}

#[get("/save/{job_id}")]
async fn saved_status(
    service: Data<JobService>,
    viewer: Viewer,
    job_id: Path<i64>,
) -> Result<HttpResponse, ServiceError> {
    let is_saved = service.is_saved(viewer.id(), job_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SavedStatusResponse { ok: true, is_saved }))
}

#[post("/save/{job_id}")]
async fn save_job(
    service: Data<JobService>,
    viewer: Viewer,
    job_id: Path<i64>,
) -> Result<HttpResponse, ServiceError> {
    let job_id = job_id.into_inner();
    service.save_job(viewer.id(), job_id).await?;
    Ok(HttpResponse::Created().json(SaveJobResponse {
        ok: true,
        message: "Job saved successfully".to_string(),
        job_id,
    }))
}

#[delete("/save/{job_id}")]
async fn unsave_job(
    service: Data<JobService>,
    viewer: Viewer,
    job_id: Path<i64>,
) -> Result<HttpResponse, ServiceError> {
    let job_id = job_id.into_inner();
    service.unsave_job(viewer.id(), job_id).await?;
    Ok(HttpResponse::Ok().json(SaveJobResponse {
        ok: true,
        message: "Job removed from saved items".to_string(),
        job_id,
    }))
}

#[get("/{id}")]
async fn job_detail(service: Data<JobService>, id: Path<i64>) -> Result<HttpResponse, ServiceError> {
    let job = service.job_detail(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JobDetailResponse { ok: true, job }))
}

/// Static segments are registered before `/{id}` so they are matched first.
pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("jobs")
            .service(list_jobs)
            .service(category_counts)
            .service(filter_options)
            .service(saved_statuses)
            .service(saved_status)
            .service(save_job)
            .service(unsave_job)
            .service(job_detail),
    );
}
