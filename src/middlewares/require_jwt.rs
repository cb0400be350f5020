/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>`，按令牌中的角色从教师表或管理员表解析登录主体，
 * 并把 [`Principal`] 放入请求扩展，供处理函数读取。
 *
 * ```rust,ignore
 * web::scope("/api/v1/jobs")
 *     .wrap(RequireJWT)
 *     .route("/my", web::get().to(list_my_jobs))
 *
 * async fn list_my_jobs(req: HttpRequest) -> ActixResult<HttpResponse> {
 *     let principal = RequireJWT::extract_principal(&req);
 *     // ...
 * }
 * ```
 *
 * 解析结果按 `principal:{token}` 缓存，过期时间不超过 access token 剩余有效期。
 * 缓存中的教师/管理员不含密码哈希，需要校验密码时应重新从存储层读取。
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::auth::entities::{Principal, UserRole};
use crate::storage::Storage;
use crate::utils::jwt::{Claims, JwtUtils};
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info, warn};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

fn cache_key(token: &str) -> String {
    format!("principal:{token}")
}

/// 按声明中的角色查表
async fn resolve_principal(storage: &Arc<dyn Storage>, claims: &Claims) -> Result<Principal, String> {
    let id = claims
        .subject_id()
        .ok_or_else(|| "Invalid subject in JWT".to_string())?;
    let role = claims
        .user_role()
        .ok_or_else(|| "Invalid role in JWT".to_string())?;

    match role {
        UserRole::Teacher => storage
            .get_teacher_by_id(id)
            .await
            .map_err(|e| format!("Failed to retrieve teacher: {e}"))?
            .map(Principal::Teacher)
            .ok_or_else(|| "Teacher not found".to_string()),
        UserRole::Inspector | UserRole::Admin => storage
            .get_admin_by_id(id)
            .await
            .map_err(|e| format!("Failed to retrieve admin: {e}"))?
            .map(Principal::Admin)
            .ok_or_else(|| "Admin not found".to_string()),
    }
}

// 提取并验证 access token，返回登录主体
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<Principal, String> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone());

    if let Some(cache) = &cache {
        match cache.get_raw(&cache_key(token)).await {
            CacheResult::Found(json) => match serde_json::from_str::<Principal>(&json) {
                Ok(principal) => return Ok(principal),
                Err(_) => {
                    cache.remove(&cache_key(token)).await;
                    warn!("Dropping undecodable cached principal");
                }
            },
            _ => debug!("Principal cache miss"),
        }
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|s| s.get_ref().clone())
        .ok_or_else(|| "Storage not configured".to_string())?;

    let principal = resolve_principal(&storage, &claims).await?;

    if let Some(cache) = &cache {
        let remaining = (claims.exp as i64 - chrono::Utc::now().timestamp()).max(1) as u64;
        let ttl = AppConfig::get().cache.default_ttl.min(remaining);
        if let Ok(json) = serde_json::to_string(&principal) {
            cache.insert_raw(cache_key(token), json, ttl).await;
        }
    }

    Ok(principal)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(principal) => {
                    debug!(
                        "JWT authentication successful for {} {}",
                        principal.role(),
                        principal.id()
                    );
                    req.extensions_mut().insert(principal);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中取出登录主体（需已应用 RequireJWT）
    pub fn extract_principal(req: &actix_web::HttpRequest) -> Option<Principal> {
        req.extensions().get::<Principal>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<Principal>().map(Principal::id)
    }

    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions().get::<Principal>().map(Principal::role)
    }

    /// 登出时清掉该令牌的缓存
    pub async fn forget_token(cache: &Arc<dyn ObjectCache>, token: &str) {
        cache.remove(&cache_key(token)).await;
    }

    /// 取出请求中的 bearer token
    pub fn bearer_token(req: &actix_web::HttpRequest) -> Option<String> {
        req.headers()
            .get(AUTHORIZATION_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix(BEARER_PREFIX))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
