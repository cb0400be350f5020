use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{JobService, load_job_for};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::files::remove_stored_bodies;
use crate::services::{internal_error, require_principal};

pub async fn delete_job(
    service: &JobService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let job = match load_job_for(&storage, &principal, id, true).await {
        Ok(job) => job,
        Err(resp) => return Ok(resp),
    };

    let files = match storage.list_files_by_job(id).await {
        Ok(files) => files,
        Err(e) => return Ok(internal_error(format!("Failed to list job files: {e}"))),
    };

    match storage.delete_job(id).await {
        Ok(true) => {
            remove_stored_bodies(&files);
            tracing::info!("Job {} deleted with {} files", id, files.len());
            Ok(HttpResponse::Ok().json(ApiResponse::success(job, "Job deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::JobNotFound,
            "Job not found",
        ))),
        Err(e) => Ok(internal_error(format!("Job deletion failed: {e}"))),
    }
}
