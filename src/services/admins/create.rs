use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::models::{ApiResponse, ErrorCode, admins::requests::CreateAdminRequest};
use crate::services::internal_error;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_password_simple, validate_username};

pub async fn create_admin(
    service: &AdminService,
    mut admin: CreateAdminRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    admin.username = admin.username.trim().to_string();
    admin.region = admin
        .region
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    if let Err(msg) = validate_username(&admin.username) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AdminUsernameInvalid, msg)));
    }

    if !admin.role.is_staff() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AdminRoleInvalid,
            "Role must be admin or inspector",
        )));
    }

    if let Err(msg) = validate_password_simple(&admin.password) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    let storage = service.get_storage(request);

    match storage.get_admin_by_username(&admin.username).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AdminUsernameAlreadyExists,
                "Username already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error(format!("Admin creation failed: {e}"))),
    }

    admin.password = match hash_password(&admin.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error(format!("Password hashing failed: {e}"))),
    };

    match storage.create_admin(admin).await {
        Ok(created) => {
            tracing::info!("Created {} {}", created.role, created.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                created,
                "Admin created successfully",
            )))
        }
        Err(e) => Ok(internal_error(format!("Admin creation failed: {e}"))),
    }
}
