pub mod create;
pub mod delete;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::achievements::requests::CreateAchievementRequest;
use crate::storage::Storage;

pub use list::group_by_section;

pub struct AchievementService {
    storage: Option<Arc<dyn Storage>>,
}

impl AchievementService {
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

    pub async fn create_achievement(
        &self,
        request: &HttpRequest,
        achievement: CreateAchievementRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_achievement(self, achievement, request).await
    }

    pub async fn list_achievements(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_achievements(self, request).await
    }

    // 某工作单位下按 section 分组的成就类别
    pub async fn list_for_job(&self, request: &HttpRequest, job_id: i64) -> ActixResult<HttpResponse> {
        list::list_for_job(self, job_id, request).await
    }

    pub async fn delete_achievement(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_achievement(self, id, request).await
    }

    pub async fn delete_all_achievements(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_all_achievements(self, request).await
    }
}
