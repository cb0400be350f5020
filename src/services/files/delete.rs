use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FileService, load_file_for, remove_stored_bodies};
use crate::models::{ApiResponse, ErrorCode, files::entities::FileStatus};
use crate::services::{forbidden, internal_error, require_principal};

/// 所有者只能删除待审核的文件，管理员不受限制
pub async fn delete_file(
    service: &FileService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let file = match load_file_for(&storage, &principal, id).await {
        Ok(file) => file,
        Err(resp) => return Ok(resp),
    };

    if !principal.is_admin() {
        if !principal.can_manage_teacher(file.teacher_id) {
            return Ok(forbidden("You can only delete your own files"));
        }
        if file.status != FileStatus::Pending {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::FileStatusConflict,
                "Reviewed files can no longer be deleted",
            )));
        }
    }

    // 非管理员按条件删除，避免与并发审核交错
    let deleted = if principal.is_admin() {
        storage.delete_file(id).await
    } else {
        storage.delete_pending_file(id).await
    };

    match deleted {
        Ok(true) => {
            remove_stored_bodies(std::slice::from_ref(&file));
            Ok(HttpResponse::Ok().json(ApiResponse::success(file, "File deleted successfully")))
        }
        Ok(false) if principal.is_admin() => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::FileNotFound, "File not found"),
        )),
        Ok(false) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::FileStatusConflict,
            "Reviewed files can no longer be deleted",
        ))),
        Err(e) => Ok(internal_error(format!("File deletion failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use crate::models::auth::entities::{Principal, UserRole};
    use crate::models::files::{entities::FileStatus, requests::ReviewDecision};
    use crate::services::FileService;
    use crate::services::test_support::{
        achievement, admin, job, pending_file, request_as, storage, teacher,
    };
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_owner_delete_only_while_pending() {
        let storage = storage().await;
        let owner = teacher(&storage, "+998901112233").await;
        let job = job(&storage, owner.id, None).await;
        let achievement = achievement(&storage).await;
        let pending = pending_file(&storage, &owner, &job, &achievement).await;
        let reviewed = pending_file(&storage, &owner, &job, &achievement).await;
        storage
            .review_file(
                reviewed.id,
                ReviewDecision {
                    status: FileStatus::Accepted,
                    inspector_score: Some(5.0),
                    message: None,
                    reviewer_id: 1,
                },
            )
            .await
            .unwrap();

        let service = FileService::new_lazy();
        let req = request_as(&storage, Principal::Teacher(owner.clone()));

        let resp = service.delete_file(&req, reviewed.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert!(storage.get_file_by_id(reviewed.id).await.unwrap().is_some());

        let resp = service.delete_file(&req, pending.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(storage.get_file_by_id(pending.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_admin_deletes_reviewed_file() {
        let storage = storage().await;
        let owner = teacher(&storage, "+998901112233").await;
        let job = job(&storage, owner.id, None).await;
        let achievement = achievement(&storage).await;
        let file = pending_file(&storage, &owner, &job, &achievement).await;
        storage
            .review_file(
                file.id,
                ReviewDecision {
                    status: FileStatus::Rejected,
                    inspector_score: None,
                    message: Some("Unreadable scan".to_string()),
                    reviewer_id: 1,
                },
            )
            .await
            .unwrap();

        let root = admin(&storage, "root", UserRole::Admin, None).await;
        let req = request_as(&storage, Principal::Admin(root));
        let resp = FileService::new_lazy()
            .delete_file(&req, file.id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(storage.get_file_by_id(file.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_other_teacher_cannot_delete() {
        let storage = storage().await;
        let owner = teacher(&storage, "+998901112233").await;
        let stranger = teacher(&storage, "+998907778899").await;
        let job = job(&storage, owner.id, None).await;
        let achievement = achievement(&storage).await;
        let file = pending_file(&storage, &owner, &job, &achievement).await;

        let req = request_as(&storage, Principal::Teacher(stranger));
        let resp = FileService::new_lazy()
            .delete_file(&req, file.id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(storage.get_file_by_id(file.id).await.unwrap().is_some());
    }
}
