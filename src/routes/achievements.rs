use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, guard, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::achievements::requests::CreateAchievementRequest;
use crate::models::auth::entities::UserRole;
use crate::services::AchievementService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AchievementService 实例
static ACHIEVEMENT_SERVICE: Lazy<AchievementService> = Lazy::new(AchievementService::new_lazy);

pub async fn list_achievements(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACHIEVEMENT_SERVICE.list_achievements(&req).await
}

pub async fn create_achievement(
    req: HttpRequest,
    achievement: web::Json<CreateAchievementRequest>,
) -> ActixResult<HttpResponse> {
    ACHIEVEMENT_SERVICE
        .create_achievement(&req, achievement.into_inner())
        .await
}

pub async fn delete_achievement(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACHIEVEMENT_SERVICE.delete_achievement(&req, id.0).await
}

pub async fn delete_all_achievements(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACHIEVEMENT_SERVICE.delete_all_achievements(&req).await
}

// 配置路由：读取对所有登录用户开放，写操作仅管理员
pub fn configure_achievement_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/achievements")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").guard(guard::Get()).to(list_achievements))
            .service(
                web::resource("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route(web::post().to(create_achievement))
                    .route(web::delete().to(delete_all_achievements)),
            )
            .service(
                web::resource("/{id}")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route(web::delete().to(delete_achievement)),
            ),
    );
}
