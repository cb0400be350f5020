pub mod create;
pub mod delete;
pub mod get;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::jobs::{
    entities::Job,
    requests::{CreateJobRequest, UpdateJobRequest},
};
use crate::models::{ApiResponse, ErrorCode, auth::entities::Principal};
use crate::services::{forbidden, internal_error};
use crate::storage::Storage;

pub struct JobService {
    storage: Option<Arc<dyn Storage>>,
}

impl JobService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn create_job(
        &self,
        request: &HttpRequest,
        job: CreateJobRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_job(self, job, request).await
    }

    pub async fn list_my_jobs(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::list_my_jobs(self, request).await
    }

    pub async fn get_job(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_job(self, id, request).await
    }

    pub async fn update_job(
        &self,
        request: &HttpRequest,
        id: i64,
        update: UpdateJobRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_job(self, id, update, request).await
    }

    pub async fn delete_job(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_job(self, id, request).await
    }
}

/// 读取工作单位并校验访问权限
///
/// `manage` 为 true 时只允许所有者或管理员，否则所有者或任一审核人员。
pub(crate) async fn load_job_for(
    storage: &Arc<dyn Storage>,
    principal: &Principal,
    id: i64,
    manage: bool,
) -> Result<Job, HttpResponse> {
    let job = match storage.get_job_by_id(id).await {
        Ok(Some(job)) => job,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::JobNotFound,
                "Job not found",
            )));
        }
        Err(e) => return Err(internal_error(format!("Failed to retrieve job: {e}"))),
    };

    let allowed = if manage {
        principal.can_manage_teacher(job.teacher_id)
    } else {
        principal.can_view_teacher(job.teacher_id)
    };

    if allowed {
        Ok(job)
    } else {
        Err(forbidden("You do not have access to this job"))
    }
}
