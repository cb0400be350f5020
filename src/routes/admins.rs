use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::admins::requests::{CreateAdminRequest, UpdateAdminRequest};
use crate::models::auth::entities::UserRole;
use crate::services::AdminService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AdminService 实例
static ADMIN_SERVICE: Lazy<AdminService> = Lazy::new(AdminService::new_lazy);

pub async fn get_profile(req: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.get_profile(&req).await
}

pub async fn list_admins(req: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_admins(&req).await
}

pub async fn create_admin(
    req: HttpRequest,
    admin: web::Json<CreateAdminRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.create_admin(&req, admin.into_inner()).await
}

pub async fn update_admin(
    req: HttpRequest,
    id: SafeIDI64,
    update: web::Json<UpdateAdminRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .update_admin(&req, id.0, update.into_inner())
        .await
}

pub async fn delete_admin(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.delete_admin(&req, id.0).await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admins")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/me")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::get().to(get_profile)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::get().to(list_admins))
                    .route("", web::post().to(create_admin))
                    .route("/{id}", web::put().to(update_admin))
                    .route("/{id}", web::delete().to(delete_admin)),
            ),
    );
}
