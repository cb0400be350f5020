use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::entities::UserRole;
use crate::models::jobs::requests::{CreateJobRequest, UpdateJobRequest};
use crate::services::{AchievementService, JobService};
use crate::utils::SafeIDI64;

// 懒加载的全局服务实例
static JOB_SERVICE: Lazy<JobService> = Lazy::new(JobService::new_lazy);
static ACHIEVEMENT_SERVICE: Lazy<AchievementService> = Lazy::new(AchievementService::new_lazy);

pub async fn create_job(
    req: HttpRequest,
    job: web::Json<CreateJobRequest>,
) -> ActixResult<HttpResponse> {
    JOB_SERVICE.create_job(&req, job.into_inner()).await
}

pub async fn list_my_jobs(req: HttpRequest) -> ActixResult<HttpResponse> {
    JOB_SERVICE.list_my_jobs(&req).await
}

pub async fn get_job(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    JOB_SERVICE.get_job(&req, id.0).await
}

pub async fn update_job(
    req: HttpRequest,
    id: SafeIDI64,
    update: web::Json<UpdateJobRequest>,
) -> ActixResult<HttpResponse> {
    JOB_SERVICE.update_job(&req, id.0, update.into_inner()).await
}

pub async fn delete_job(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    JOB_SERVICE.delete_job(&req, id.0).await
}

pub async fn job_achievements(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACHIEVEMENT_SERVICE.list_for_job(&req, id.0).await
}

// 配置路由
pub fn configure_job_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/jobs")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route(web::post().to(create_job)),
            )
            .service(web::resource("/my").route(web::get().to(list_my_jobs)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_job))
                    .route(web::put().to(update_job))
                    .route(web::delete().to(delete_job)),
            )
            .service(web::resource("/{id}/achievements").route(web::get().to(job_achievements))),
    );
}
