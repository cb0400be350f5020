pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::admins::requests::{CreateAdminRequest, UpdateAdminRequest};
use crate::storage::Storage;

pub struct AdminService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdminService {
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

    pub async fn get_profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::get_profile(self, request).await
    }

    pub async fn list_admins(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_admins(self, request).await
    }

    pub async fn create_admin(
        &self,
        request: &HttpRequest,
        admin: CreateAdminRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_admin(self, admin, request).await
    }

    pub async fn update_admin(
        &self,
        request: &HttpRequest,
        id: i64,
        update: UpdateAdminRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_admin(self, id, update, request).await
    }

    pub async fn delete_admin(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_admin(self, id, request).await
    }
}
