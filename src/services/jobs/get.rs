use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{JobService, load_job_for};
use crate::models::{ApiResponse, jobs::responses::JobDetailResponse};
use crate::services::{forbidden, internal_error, require_principal};

pub async fn list_my_jobs(
    service: &JobService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };
    let Some(teacher_id) = principal.as_teacher().map(|t| t.id) else {
        return Ok(forbidden("Only teachers have jobs"));
    };

    match service.get_storage(request).list_jobs_by_teacher(teacher_id).await {
        Ok(jobs) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            jobs,
            "Jobs retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!("Failed to retrieve jobs: {e}"))),
    }
}

pub async fn get_job(
    service: &JobService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let job = match load_job_for(&storage, &principal, id, false).await {
        Ok(job) => job,
        Err(resp) => return Ok(resp),
    };

    match storage.list_files_by_job(job.id).await {
        Ok(files) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            JobDetailResponse { job, files },
            "Job retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!("Failed to retrieve job files: {e}"))),
    }
}
