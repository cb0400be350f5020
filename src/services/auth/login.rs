use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AuthService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{
        entities::UserRole,
        requests::{AdminLoginRequest, TeacherLoginRequest},
        responses::{AdminAuthResponse, TeacherAuthResponse},
    },
};
use crate::utils::jwt::{JwtUtils, TokenPair};
use crate::utils::password::verify_password;
use crate::utils::validate::normalize_phone;

fn auth_failed(message: &str) -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(ErrorCode::AuthFailed, message))
}

fn token_failed(e: jsonwebtoken::errors::Error) -> HttpResponse {
    tracing::error!("Failed to generate JWT token: {}", e);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        "Login failed, unable to generate token",
    ))
}

fn with_refresh_cookie<T: serde::Serialize>(pair_refresh: &str, body: ApiResponse<T>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(JwtUtils::create_refresh_token_cookie(pair_refresh))
        .json(body)
}

pub async fn handle_teacher_login(
    service: &AuthService,
    login_request: TeacherLoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let phone = normalize_phone(&login_request.phone);

    let teacher = match storage.get_teacher_by_phone(&phone).await {
        Ok(Some(teacher)) => teacher,
        Ok(None) => return Ok(auth_failed("Phone number or password is incorrect")),
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Login failed: {e}"),
            )));
        }
    };

    if !verify_password(&login_request.password, &teacher.password_hash) {
        return Ok(auth_failed("Phone number or password is incorrect"));
    }

    let TokenPair {
        access_token,
        refresh_token,
        expires_in,
    } = match JwtUtils::generate_token_pair(teacher.id, UserRole::Teacher) {
        Ok(pair) => pair,
        Err(e) => return Ok(token_failed(e)),
    };

    tracing::info!("Teacher {} logged in", teacher.id);

    Ok(with_refresh_cookie(
        &refresh_token,
        ApiResponse::success(
            TeacherAuthResponse {
                access_token,
                expires_in,
                teacher,
            },
            "Login successful",
        ),
    ))
}

pub async fn handle_admin_login(
    service: &AuthService,
    login_request: AdminLoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let admin = match storage
        .get_admin_by_username(login_request.username.trim())
        .await
    {
        Ok(Some(admin)) => admin,
        Ok(None) => return Ok(auth_failed("Username or password is incorrect")),
        Err(e) => {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Login failed: {e}"),
            )));
        }
    };

    if !verify_password(&login_request.password, &admin.password_hash) {
        return Ok(auth_failed("Username or password is incorrect"));
    }

    if let Err(e) = storage.update_admin_last_login(admin.id).await {
        tracing::warn!("Failed to record last login for admin {}: {}", admin.id, e);
    }

    let TokenPair {
        access_token,
        refresh_token,
        expires_in,
    } = match JwtUtils::generate_token_pair(admin.id, admin.role) {
        Ok(pair) => pair,
        Err(e) => return Ok(token_failed(e)),
    };

    tracing::info!("{} {} logged in", admin.role, admin.username);

    Ok(with_refresh_cookie(
        &refresh_token,
        ApiResponse::success(
            AdminAuthResponse {
                access_token,
                expires_in,
                admin,
            },
            "Login successful",
        ),
    ))
}
