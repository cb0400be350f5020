use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::requests::{AdminLoginRequest, TeacherLoginRequest};
use crate::models::teachers::requests::CreateTeacherRequest;
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn register_teacher(
    req: HttpRequest,
    teacher_data: web::Json<CreateTeacherRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .register_teacher(teacher_data.into_inner(), &req)
        .await
}

pub async fn login_teacher(
    req: HttpRequest,
    login_data: web::Json<TeacherLoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login_teacher(login_data.into_inner(), &req).await
}

pub async fn login_admin(
    req: HttpRequest,
    login_data: web::Json<AdminLoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login_admin(login_data.into_inner(), &req).await
}

pub async fn refresh_token(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.refresh_token(&request).await
}

pub async fn logout(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&request).await
}

pub async fn me(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.me(&request).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .route("/teachers/register", web::post().to(register_teacher))
            .route("/teachers/login", web::post().to(login_teacher))
            .route("/admins/login", web::post().to(login_admin))
            .route("/refresh", web::post().to(refresh_token))
            .route("/logout", web::post().to(logout))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/me", web::get().to(me)),
            ),
    );
}
