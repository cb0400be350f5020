use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;

pub async fn delete_admin(
    service: &AdminService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 禁止删除当前登录的管理员
    if RequireJWT::extract_user_id(request) == Some(id) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CanNotDeleteCurrentAdmin,
            "Cannot delete the current admin",
        )));
    }

    match service.get_storage(request).delete_admin(id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Admin deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AdminNotFound,
            "Admin not found",
        ))),
        Err(e) => Ok(internal_error(format!("Admin deletion failed: {e}"))),
    }
}
