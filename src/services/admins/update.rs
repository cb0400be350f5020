use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, admins::requests::UpdateAdminRequest, auth::entities::UserRole,
};
use crate::services::internal_error;
use crate::utils::password::hash_password;
use crate::utils::validate::validate_password_simple;

pub async fn update_admin(
    service: &AdminService,
    id: i64,
    mut update: UpdateAdminRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(role) = update.role
        && !role.is_staff()
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AdminRoleInvalid,
            "Role must be admin or inspector",
        )));
    }

    // 禁止把当前登录的管理员降级，否则可能不再有管理员
    if update.role.is_some_and(|role| role != UserRole::Admin)
        && RequireJWT::extract_user_id(request) == Some(id)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CanNotDemoteCurrentAdmin,
            "Cannot change the role of the current admin",
        )));
    }

    if let Some(password) = update.password.take() {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
        update.password = match hash_password(&password) {
            Ok(hash) => Some(hash),
            Err(e) => return Ok(internal_error(format!("Password hashing failed: {e}"))),
        };
    }

    update.region = update.region.map(|r| r.trim().to_string());

    match service.get_storage(request).update_admin(id, update).await {
        Ok(Some(admin)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            admin,
            "Admin updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AdminNotFound,
            "Admin not found",
        ))),
        Err(e) => Ok(internal_error(format!("Admin update failed: {e}"))),
    }
}
