use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AchievementService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::files::remove_stored_bodies;
use crate::services::internal_error;

pub async fn delete_achievement(
    service: &AchievementService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let achievement = match storage.get_achievement_by_id(id).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AchievementNotFound,
                "Achievement not found",
            )));
        }
        Err(e) => return Ok(internal_error(format!("Failed to retrieve achievement: {e}"))),
    };

    let files = match storage.list_files_by_achievement(id).await {
        Ok(files) => files,
        Err(e) => return Ok(internal_error(format!("Failed to list achievement files: {e}"))),
    };

    match storage.delete_achievement(id).await {
        Ok(_) => {
            remove_stored_bodies(&files);
            tracing::info!("Achievement {} deleted with {} files", id, files.len());
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                achievement,
                "Achievement deleted successfully",
            )))
        }
        Err(e) => Ok(internal_error(format!("Achievement deletion failed: {e}"))),
    }
}

pub async fn delete_all_achievements(
    service: &AchievementService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 记录文件体，删库后清理
    let mut files = Vec::new();
    match storage.list_achievements().await {
        Ok(achievements) => {
            for a in achievements {
                match storage.list_files_by_achievement(a.id).await {
                    Ok(mut f) => files.append(&mut f),
                    Err(e) => {
                        return Ok(internal_error(format!(
                            "Failed to list achievement files: {e}"
                        )));
                    }
                }
            }
        }
        Err(e) => return Ok(internal_error(format!("Failed to retrieve achievements: {e}"))),
    }

    match storage.delete_all_achievements().await {
        Ok(removed) => {
            remove_stored_bodies(&files);
            tracing::warn!("All {} achievements deleted", removed.len());
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                removed,
                "All achievements deleted successfully",
            )))
        }
        Err(e) => Ok(internal_error(format!("Achievement deletion failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use crate::models::auth::entities::{Principal, UserRole};
    use crate::services::AchievementService;
    use crate::services::test_support::{
        achievement, admin, job, pending_file, request_as, storage, teacher,
    };
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_delete_achievement_removes_its_files() {
        let storage = storage().await;
        let owner = teacher(&storage, "+998901112233").await;
        let job = job(&storage, owner.id, Some("Tashkent")).await;
        let doomed = achievement(&storage).await;
        let kept = achievement(&storage).await;
        let gone = pending_file(&storage, &owner, &job, &doomed).await;
        let other = pending_file(&storage, &owner, &job, &kept).await;

        let root = admin(&storage, "root", UserRole::Admin, None).await;
        let req = request_as(&storage, Principal::Admin(root));
        let service = AchievementService::new_lazy();

        let resp = service.delete_achievement(&req, doomed.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(storage.get_file_by_id(gone.id).await.unwrap().is_none());
        assert!(storage.get_file_by_id(other.id).await.unwrap().is_some());
        assert!(
            storage
                .list_files_by_achievement(doomed.id)
                .await
                .unwrap()
                .is_empty()
        );

        let resp = service.delete_achievement(&req, doomed.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
