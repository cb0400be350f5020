use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{forbidden, internal_error, require_principal};

pub async fn get_profile(
    service: &AdminService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };
    let Some(admin_id) = principal.as_admin().map(|a| a.id) else {
        return Ok(forbidden("Only administrators and inspectors have this profile"));
    };

    match service.get_storage(request).get_admin_by_id(admin_id).await {
        Ok(Some(admin)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            admin,
            "Profile retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AdminNotFound,
            "Admin not found",
        ))),
        Err(e) => Ok(internal_error(format!("Failed to retrieve admin: {e}"))),
    }
}

pub async fn list_admins(
    service: &AdminService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).list_admins().await {
        Ok(admins) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            admins,
            "Admin list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!("Failed to retrieve admin list: {e}"))),
    }
}
