use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{JobService, load_job_for};
use crate::models::{ApiResponse, ErrorCode, jobs::requests::UpdateJobRequest};
use crate::services::{internal_error, require_principal};
use crate::utils::validate::validate_required_text;

pub async fn update_job(
    service: &JobService,
    id: i64,
    mut update: UpdateJobRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    for (value, field) in [
        (&mut update.title, "title"),
        (&mut update.workplace, "workplace"),
    ] {
        if let Some(value) = value {
            *value = value.trim().to_string();
            if let Err(msg) = validate_required_text(value, field) {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::JobInvalid, msg)));
            }
        }
    }

    // 去掉首尾空白，空字符串交给存储层清除地区
    update.region = update.region.map(|r| r.trim().to_string());

    let storage = service.get_storage(request);
    if let Err(resp) = load_job_for(&storage, &principal, id, true).await {
        return Ok(resp);
    }

    // 已提交文件保留上传时的快照
    match storage.update_job(id, update).await {
        Ok(Some(job)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            job,
            "Job updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::JobNotFound,
            "Job not found",
        ))),
        Err(e) => Ok(internal_error(format!("Job update failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use crate::models::auth::entities::{Principal, UserRole};
    use crate::models::common::pagination::PaginationQuery;
    use crate::models::jobs::requests::UpdateJobRequest;
    use crate::services::JobService;
    use crate::services::test_support::{
        achievement, admin, job, pending_file, request_as, storage, teacher,
    };
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_region_update_is_trimmed_for_inspectors() {
        let storage = storage().await;
        let owner = teacher(&storage, "+998901112233").await;
        let created = job(&storage, owner.id, Some("Samarkand")).await;
        let req = request_as(&storage, Principal::Teacher(owner.clone()));

        let resp = JobService::new_lazy()
            .update_job(
                &req,
                created.id,
                UpdateJobRequest {
                    region: Some("  Bukhara ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let updated = storage.get_job_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(updated.region.as_deref(), Some("Bukhara"));

        let achievement = achievement(&storage).await;
        let file = pending_file(&storage, &owner, &updated, &achievement).await;
        let inspector = admin(&storage, "bukhara", UserRole::Inspector, Some("Bukhara")).await;
        let pending = storage
            .list_pending_files_with_pagination(
                inspector.region.as_deref(),
                PaginationQuery::default(),
            )
            .await
            .unwrap();
        assert_eq!(pending.items.len(), 1);
        assert_eq!(pending.items[0].id, file.id);
    }
}
