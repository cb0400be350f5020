use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::JobService;
use crate::models::{ApiResponse, ErrorCode, jobs::requests::CreateJobRequest};
use crate::services::{forbidden, internal_error, require_principal};
use crate::utils::validate::validate_required_text;

pub async fn create_job(
    service: &JobService,
    mut job: CreateJobRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };
    let Some(teacher_id) = principal.as_teacher().map(|t| t.id) else {
        return Ok(forbidden("Only teachers can add jobs"));
    };

    job.title = job.title.trim().to_string();
    job.workplace = job.workplace.trim().to_string();
    job.region = job
        .region
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    if let Err(msg) = validate_required_text(&job.title, "title")
        .and_then(|_| validate_required_text(&job.workplace, "workplace"))
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::JobInvalid, msg)));
    }

    match service.get_storage(request).create_job(teacher_id, job).await {
        Ok(job) => Ok(HttpResponse::Created().json(ApiResponse::success(
            job,
            "Job created successfully",
        ))),
        Err(e) => Ok(internal_error(format!("Job creation failed: {e}"))),
    }
}
