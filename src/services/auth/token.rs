use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AuthService;
use crate::models::auth::responses::{PrincipalResponse, RefreshTokenResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::require_principal;
use crate::utils::jwt::JwtUtils;

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let rejected = || {
        // 清除无效的 refresh token cookie
        HttpResponse::Unauthorized()
            .cookie(JwtUtils::create_empty_refresh_token_cookie())
            .json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Login expired or invalid, please login again",
            ))
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(rejected());
        }
    };

    // 账号已被删除时不再续期
    let storage = service.get_storage(request);
    let exists = match (claims.subject_id(), claims.user_role()) {
        (Some(id), Some(role)) if role.is_staff() => {
            matches!(storage.get_admin_by_id(id).await, Ok(Some(_)))
        }
        (Some(id), Some(_)) => matches!(storage.get_teacher_by_id(id).await, Ok(Some(_))),
        _ => false,
    };
    if !exists {
        return Ok(rejected());
    }

    match JwtUtils::refresh_access_token(&refresh_token) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: JwtUtils::access_token_ttl_secs(),
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            tracing::error!("Refresh token failed: {}", e);
            Ok(rejected())
        }
    }
}

pub async fn handle_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PrincipalResponse { principal },
        "Current principal retrieved successfully",
    )))
}
