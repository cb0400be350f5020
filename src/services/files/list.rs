use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FileService, load_file_for};
use crate::models::{ApiResponse, files::requests::PendingFileParams};
use crate::services::{forbidden, internal_error, require_principal};

/// 待审核文件；地区检查员只看到本地区
pub async fn list_pending(
    service: &FileService,
    query: PendingFileParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    match service
        .get_storage(request)
        .list_pending_files_with_pagination(principal.review_region(), query.pagination)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Pending files retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!("Failed to retrieve pending files: {e}"))),
    }
}

pub async fn list_my_files(
    service: &FileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };
    let Some(teacher_id) = principal.as_teacher().map(|t| t.id) else {
        return Ok(forbidden("Only teachers have submitted files"));
    };

    match service.get_storage(request).list_files_by_teacher(teacher_id).await {
        Ok(files) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            files,
            "Files retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!("Failed to retrieve files: {e}"))),
    }
}

pub async fn get_file(
    service: &FileService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    match load_file_for(&service.get_storage(request), &principal, id).await {
        Ok(file) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            file,
            "File retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}
