use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::models::{ApiResponse, ErrorCode, teachers::requests::TeacherListQuery};
use crate::services::files::remove_stored_bodies;
use crate::services::{forbidden, internal_error, require_principal};

/// 删除教师及其工作单位、文件；返回剩余教师的第一页
pub async fn delete_teacher(
    service: &TeacherService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    if !principal.can_manage_teacher(id) {
        return Ok(forbidden("You can only delete your own account"));
    }

    let storage = service.get_storage(request);

    // 先记下文件体，记录删除后再清理磁盘
    let files = match storage.list_files_by_teacher(id).await {
        Ok(files) => files,
        Err(e) => return Ok(internal_error(format!("Failed to list teacher files: {e}"))),
    };

    match storage.delete_teacher(id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TeacherNotFound,
                "Teacher not found",
            )));
        }
        Err(e) => return Ok(internal_error(format!("Teacher deletion failed: {e}"))),
    }

    remove_stored_bodies(&files);
    tracing::info!("Teacher {} deleted by {} {}", id, principal.role(), principal.id());

    match storage
        .list_teachers_with_pagination(TeacherListQuery::default())
        .await
    {
        Ok(remaining) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            remaining,
            "Teacher deleted successfully",
        ))),
        Err(e) => Ok(internal_error(format!(
            "Teacher deleted but listing remaining teachers failed: {e}"
        ))),
    }
}
