use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::models::{ApiResponse, ErrorCode, teachers::requests::ChangePasswordRequest};
use crate::services::{forbidden, internal_error, require_principal};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password_simple;

pub async fn change_password(
    service: &TeacherService,
    change: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };
    let Some(teacher_id) = principal.as_teacher().map(|t| t.id) else {
        return Ok(forbidden("Only teachers can change their password here"));
    };

    if let Err(msg) = validate_password_simple(&change.new_password) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::TeacherPasswordInvalid,
            msg,
        )));
    }

    // 缓存里的主体不带哈希，重新读库
    let storage = service.get_storage(request);
    let teacher = match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(t)) => t,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TeacherNotFound,
                "Teacher not found",
            )));
        }
        Err(e) => return Ok(internal_error(format!("Failed to retrieve teacher: {e}"))),
    };

    if !verify_password(&change.old_password, &teacher.password_hash) {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Old password is incorrect",
        )));
    }

    let hash = match hash_password(&change.new_password) {
        Ok(h) => h,
        Err(e) => return Ok(internal_error(format!("Password hashing failed: {e}"))),
    };

    match storage.update_teacher_password(teacher_id, &hash).await {
        Ok(true) => {
            tracing::info!("Teacher {} changed password", teacher_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Password changed successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TeacherNotFound,
            "Teacher not found",
        ))),
        Err(e) => Ok(internal_error(format!("Password change failed: {e}"))),
    }
}
