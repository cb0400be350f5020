pub mod achievements;
pub mod admins;
pub mod auth;
pub mod files;
pub mod jobs;
pub mod teachers;

pub use achievements::AchievementService;
pub use admins::AdminService;
pub use auth::AuthService;
pub use files::FileService;
pub use jobs::JobService;
pub use teachers::TeacherService;

use actix_web::{HttpRequest, HttpResponse};

use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, auth::entities::Principal};

/// 取出登录主体，缺失时返回 401 响应
pub(crate) fn require_principal(request: &HttpRequest) -> Result<Principal, HttpResponse> {
    RequireJWT::extract_principal(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

pub(crate) fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}

pub(crate) fn internal_error(message: String) -> HttpResponse {
    tracing::error!("{}", message);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        message,
    ))
}

#[cfg(test)]
pub(crate) mod test_support {
    //! 处理函数测试用的内存存储与登录主体

    use actix_web::{HttpMessage, HttpRequest, HttpResponse, test::TestRequest, web};
    use std::sync::Arc;

    use crate::models::{
        achievements::{
            entities::{Achievement, RatingOption},
            requests::CreateAchievementRequest,
        },
        admins::{entities::Admin, requests::CreateAdminRequest},
        auth::entities::{Principal, UserRole},
        files::{entities::SubmittedFile, requests::NewFileRecord},
        jobs::{entities::Job, requests::CreateJobRequest},
        teachers::{entities::Teacher, requests::CreateTeacherRequest},
    };
    use crate::storage::{Storage, sea_orm_storage::test_support::memory_storage};

    pub async fn storage() -> Arc<dyn Storage> {
        Arc::new(memory_storage().await)
    }

    /// 挂好存储和登录主体的请求
    pub fn request_as(storage: &Arc<dyn Storage>, principal: Principal) -> HttpRequest {
        let req = TestRequest::default()
            .app_data(web::Data::new(storage.clone()))
            .to_http_request();
        req.extensions_mut().insert(principal);
        req
    }

    pub async fn teacher(storage: &Arc<dyn Storage>, phone: &str) -> Teacher {
        storage
            .create_teacher(CreateTeacherRequest {
                first_name: "Dilnoza".to_string(),
                last_name: "Yusupova".to_string(),
                phone: phone.to_string(),
                password: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn admin(
        storage: &Arc<dyn Storage>,
        username: &str,
        role: UserRole,
        region: Option<&str>,
    ) -> Admin {
        storage
            .create_admin(CreateAdminRequest {
                username: username.to_string(),
                password: "hash".to_string(),
                role,
                region: region.map(str::to_string),
            })
            .await
            .unwrap()
    }

    pub async fn job(storage: &Arc<dyn Storage>, teacher_id: i64, region: Option<&str>) -> Job {
        storage
            .create_job(
                teacher_id,
                CreateJobRequest {
                    title: "English teacher".to_string(),
                    workplace: "School 21".to_string(),
                    region: region.map(str::to_string),
                },
            )
            .await
            .unwrap()
    }

    pub async fn achievement(storage: &Arc<dyn Storage>) -> Achievement {
        storage
            .create_achievement(CreateAchievementRequest {
                section: "Olympiads".to_string(),
                title: "Student winners".to_string(),
                ratings: vec![RatingOption {
                    about: "Regional".to_string(),
                    rating: Some(5.0),
                }],
            })
            .await
            .unwrap()
    }

    /// 按上传流程的快照字段写入一条待审核文件
    pub async fn pending_file(
        storage: &Arc<dyn Storage>,
        teacher: &Teacher,
        job: &Job,
        achievement: &Achievement,
    ) -> SubmittedFile {
        storage
            .create_file(NewFileRecord {
                title: "Diploma".to_string(),
                stored_name: format!("{}.pdf", uuid::Uuid::new_v4()),
                original_name: "diploma.pdf".to_string(),
                file_size: 2048,
                file_type: ".pdf".to_string(),
                teacher_id: teacher.id,
                teacher_first_name: teacher.first_name.clone(),
                teacher_last_name: teacher.last_name.clone(),
                job_id: job.id,
                job_title: job.title.clone(),
                job_workplace: job.workplace.clone(),
                region: job.region.clone(),
                achievement_id: achievement.id,
                achievement_title: achievement.title.clone(),
                achievement_section: achievement.section.clone(),
                rating_title: "Regional".to_string(),
                rating: 5.0,
            })
            .await
            .unwrap()
    }

    pub async fn body_json(resp: HttpResponse) -> serde_json::Value {
        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
