use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FileService, load_file_for};
use crate::models::{
    ApiResponse, ErrorCode,
    auth::entities::Principal,
    files::{
        entities::{FileStatus, SubmittedFile},
        requests::{AcceptFileRequest, RejectFileRequest, ReviewDecision},
    },
};
use crate::services::{forbidden, internal_error, require_principal};

/// 审核分值：缺省取申报分值，给出时须在 0..=申报分值 之内
pub fn resolve_inspector_score(claimed: f64, score: Option<f64>) -> Result<f64, String> {
    match score {
        None => Ok(claimed),
        Some(s) if s.is_finite() && (0.0..=claimed).contains(&s) => Ok(s),
        Some(s) => Err(format!("Score {s} must be between 0 and {claimed}")),
    }
}

fn conflict(file: &SubmittedFile) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::FileStatusConflict,
        format!("File has already been reviewed (status: {})", file.status),
    ))
}

/// 校验审核权限与当前状态
fn check_reviewable(
    principal: &Principal,
    file: &SubmittedFile,
    next: FileStatus,
) -> Result<(), HttpResponse> {
    if let Some(region) = principal.review_region()
        && file.region.as_deref() != Some(region)
    {
        return Err(forbidden("File is outside your review region"));
    }
    if !file.status.can_transition_to(next) {
        return Err(conflict(file));
    }
    Ok(())
}

async fn apply(
    service: &FileService,
    request: &HttpRequest,
    file: SubmittedFile,
    decision: ReviewDecision,
) -> HttpResponse {
    let status = decision.status;
    match service.get_storage(request).review_file(file.id, decision).await {
        Ok(Some(reviewed)) => {
            tracing::info!(
                "File {} marked {} by reviewer {}",
                reviewed.id,
                status,
                reviewed.reviewed_by.unwrap_or_default()
            );
            HttpResponse::Ok().json(ApiResponse::success(reviewed, "File reviewed successfully"))
        }
        // 并发审核中被他人抢先
        Ok(None) => conflict(&file),
        Err(e) => internal_error(format!("File review failed: {e}")),
    }
}

pub async fn accept_file(
    service: &FileService,
    id: i64,
    accept: AcceptFileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    let file = match load_file_for(&service.get_storage(request), &principal, id).await {
        Ok(file) => file,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = check_reviewable(&principal, &file, FileStatus::Accepted) {
        return Ok(resp);
    }

    let score = match resolve_inspector_score(file.rating, accept.score) {
        Ok(score) => score,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::RatingInvalid, msg)));
        }
    };

    let decision = ReviewDecision {
        status: FileStatus::Accepted,
        inspector_score: Some(score),
        message: accept
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty()),
        reviewer_id: principal.id(),
    };
    Ok(apply(service, request, file, decision).await)
}

pub async fn reject_file(
    service: &FileService,
    id: i64,
    reject: RejectFileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    let message = reject.message.trim().to_string();
    if message.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ReviewMessageRequired,
            "A rejection message is required",
        )));
    }

    let file = match load_file_for(&service.get_storage(request), &principal, id).await {
        Ok(file) => file,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = check_reviewable(&principal, &file, FileStatus::Rejected) {
        return Ok(resp);
    }

    let decision = ReviewDecision {
        status: FileStatus::Rejected,
        inspector_score: None,
        message: Some(message),
        reviewer_id: principal.id(),
    };
    Ok(apply(service, request, file, decision).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_defaults_to_claimed() {
        assert_eq!(resolve_inspector_score(7.5, None), Ok(7.5));
    }

    #[test]
    fn test_score_bounds() {
        assert_eq!(resolve_inspector_score(10.0, Some(0.0)), Ok(0.0));
        assert_eq!(resolve_inspector_score(10.0, Some(10.0)), Ok(10.0));
        assert!(resolve_inspector_score(10.0, Some(10.5)).is_err());
        assert!(resolve_inspector_score(10.0, Some(-1.0)).is_err());
        assert!(resolve_inspector_score(10.0, Some(f64::NAN)).is_err());
    }

    use crate::models::auth::entities::UserRole;
    use crate::services::test_support::{
        achievement, admin, job, pending_file, request_as, storage, teacher,
    };
    use actix_web::http::StatusCode;

    fn reject(message: &str) -> RejectFileRequest {
        RejectFileRequest {
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_review_missing_file_is_not_found() {
        let storage = storage().await;
        let reviewer = admin(&storage, "root", UserRole::Admin, None).await;
        let req = request_as(&storage, Principal::Admin(reviewer));
        let service = FileService::new_lazy();

        let resp = service
            .accept_file(&req, 404, AcceptFileRequest::default())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = service.reject_file(&req, 404, reject("blurry")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_second_review_conflicts() {
        let storage = storage().await;
        let owner = teacher(&storage, "+998901112233").await;
        let job = job(&storage, owner.id, None).await;
        let achievement = achievement(&storage).await;
        let file = pending_file(&storage, &owner, &job, &achievement).await;
        let reviewer = admin(&storage, "root", UserRole::Admin, None).await;
        let req = request_as(&storage, Principal::Admin(reviewer));
        let service = FileService::new_lazy();

        let resp = service
            .accept_file(
                &req,
                file.id,
                AcceptFileRequest {
                    score: Some(4.0),
                    message: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = service
            .reject_file(&req, file.id, reject("changed my mind"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = service
            .accept_file(&req, file.id, AcceptFileRequest::default())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let stored = storage.get_file_by_id(file.id).await.unwrap().unwrap();
        assert_eq!(stored.status, FileStatus::Accepted);
        assert_eq!(stored.inspector_score, Some(4.0));
    }

    #[tokio::test]
    async fn test_inspector_outside_region_is_forbidden() {
        let storage = storage().await;
        let owner = teacher(&storage, "+998901112233").await;
        let job = job(&storage, owner.id, Some("Bukhara")).await;
        let achievement = achievement(&storage).await;
        let file = pending_file(&storage, &owner, &job, &achievement).await;
        let service = FileService::new_lazy();

        let outsider = admin(&storage, "andijan", UserRole::Inspector, Some("Andijan")).await;
        let req = request_as(&storage, Principal::Admin(outsider));
        let resp = service
            .accept_file(&req, file.id, AcceptFileRequest::default())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let stored = storage.get_file_by_id(file.id).await.unwrap().unwrap();
        assert_eq!(stored.status, FileStatus::Pending);

        let local = admin(&storage, "bukhara", UserRole::Inspector, Some("Bukhara")).await;
        let req = request_as(&storage, Principal::Admin(local));
        let resp = service
            .reject_file(&req, file.id, reject("Stamp is missing"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_reject_requires_message() {
        let storage = storage().await;
        let owner = teacher(&storage, "+998901112233").await;
        let job = job(&storage, owner.id, None).await;
        let achievement = achievement(&storage).await;
        let file = pending_file(&storage, &owner, &job, &achievement).await;
        let reviewer = admin(&storage, "root", UserRole::Admin, None).await;
        let req = request_as(&storage, Principal::Admin(reviewer));

        let resp = FileService::new_lazy()
            .reject_file(&req, file.id, reject("   "))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let stored = storage.get_file_by_id(file.id).await.unwrap().unwrap();
        assert_eq!(stored.status, FileStatus::Pending);
    }
}
