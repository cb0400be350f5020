use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AuthService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{entities::UserRole, responses::TeacherAuthResponse},
    teachers::requests::CreateTeacherRequest,
};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    normalize_phone, validate_password_simple, validate_person_name, validate_phone,
};

pub async fn handle_register_teacher(
    service: &AuthService,
    mut create_request: CreateTeacherRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    create_request.first_name = create_request.first_name.trim().to_string();
    create_request.last_name = create_request.last_name.trim().to_string();
    create_request.phone = normalize_phone(&create_request.phone);

    if let Err(msg) = validate_person_name(&create_request.first_name)
        .and_then(|_| validate_person_name(&create_request.last_name))
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::TeacherNameInvalid, msg)));
    }

    if let Err(msg) = validate_phone(&create_request.phone) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::TeacherPhoneInvalid, msg)));
    }

    if let Err(msg) = validate_password_simple(&create_request.password) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::TeacherPasswordInvalid,
            msg,
        )));
    }

    let storage = service.get_storage(request);

    match storage.get_teacher_by_phone(&create_request.phone).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::TeacherPhoneAlreadyExists,
                "A teacher with this phone number already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Registration failed: {e}"),
            )));
        }
    }

    create_request.password = match hash_password(&create_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                "Registration failed",
            )));
        }
    };

    let teacher = match storage.create_teacher(create_request).await {
        Ok(teacher) => teacher,
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Registration failed: {e}"),
            )));
        }
    };

    let token_pair = match JwtUtils::generate_token_pair(teacher.id, UserRole::Teacher) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Registration succeeded but token generation failed, please login",
            )));
        }
    };

    tracing::info!("Teacher {} registered", teacher.id);

    let refresh_cookie = JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token);
    let response = TeacherAuthResponse {
        access_token: token_pair.access_token,
        expires_in: token_pair.expires_in,
        teacher,
    };

    Ok(HttpResponse::Created()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Registration successful")))
}
