pub mod delete;
pub mod download;
pub mod list;
pub mod review;
pub mod score;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::auth::entities::Principal;
use crate::models::files::{
    entities::SubmittedFile,
    requests::{AcceptFileRequest, PendingFileParams, RejectFileRequest, ScoreQuery},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{forbidden, internal_error};
use crate::storage::Storage;

pub use score::aggregate_scores;

pub struct FileService {
    storage: Option<Arc<dyn Storage>>,
}

impl FileService {
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

    pub async fn handle_upload(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, payload).await
    }

    pub async fn handle_download(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, id).await
    }

    pub async fn list_pending(
        &self,
        request: &HttpRequest,
        query: PendingFileParams,
    ) -> ActixResult<HttpResponse> {
        list::list_pending(self, query, request).await
    }

    pub async fn list_my_files(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_my_files(self, request).await
    }

    pub async fn get_file(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        list::get_file(self, id, request).await
    }

    pub async fn accept_file(
        &self,
        request: &HttpRequest,
        id: i64,
        accept: AcceptFileRequest,
    ) -> ActixResult<HttpResponse> {
        review::accept_file(self, id, accept, request).await
    }

    pub async fn reject_file(
        &self,
        request: &HttpRequest,
        id: i64,
        reject: RejectFileRequest,
    ) -> ActixResult<HttpResponse> {
        review::reject_file(self, id, reject, request).await
    }

    pub async fn delete_file(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_file(self, id, request).await
    }

    pub async fn teacher_score(
        &self,
        request: &HttpRequest,
        teacher_id: i64,
        query: ScoreQuery,
    ) -> ActixResult<HttpResponse> {
        score::teacher_score(self, teacher_id, query, request).await
    }
}

/// 文件体在磁盘上的路径
pub(crate) fn stored_path(stored_name: &str) -> PathBuf {
    PathBuf::from(&AppConfig::get().upload.dir).join(stored_name)
}

/// 尽力删除文件体；失败只记日志
pub(crate) fn remove_stored_bodies(files: &[SubmittedFile]) {
    for file in files {
        let path = stored_path(&file.stored_name);
        if let Err(e) = std::fs::remove_file(&path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!("Failed to remove stored body {}: {}", path.display(), e);
        }
    }
}

/// 读取文件并校验查看权限（所有者或审核人员）
pub(crate) async fn load_file_for(
    storage: &Arc<dyn Storage>,
    principal: &Principal,
    id: i64,
) -> Result<SubmittedFile, HttpResponse> {
    match storage.get_file_by_id(id).await {
        Ok(Some(file)) if principal.can_view_teacher(file.teacher_id) => Ok(file),
        Ok(Some(_)) => Err(forbidden("You do not have access to this file")),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "File not found",
        ))),
        Err(e) => Err(internal_error(format!("Failed to retrieve file: {e}"))),
    }
}
