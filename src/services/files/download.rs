use actix_web::{
    HttpRequest, HttpResponse, Result as ActixResult,
    http::header::{self, ContentDisposition, DispositionParam, DispositionType},
};

use super::{FileService, load_file_for, stored_path};
use crate::errors::PortfolioError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::require_principal;

pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    let file = match load_file_for(&service.get_storage(request), &principal, id).await {
        Ok(file) => file,
        Err(resp) => return Ok(resp),
    };

    let path = stored_path(&file.stored_name);
    let body = match std::fs::read(&path) {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("Stored body missing for file {}: {}", file.id, path.display());
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "Stored file is missing",
            )));
        }
        Err(e) => {
            tracing::error!("{}", PortfolioError::from(e));
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "File read failed",
                )),
            );
        }
    };

    // 使用上传时的原始文件名
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "application/octet-stream"))
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.original_name)],
        })
        .body(body))
}
