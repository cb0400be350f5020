use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::{ApiResponse, ErrorCode, auth::entities::UserRole};
use crate::models::files::requests::{AcceptFileRequest, PendingFileParams, RejectFileRequest};
use crate::services::FileService;
use crate::utils::SafeIDI64;

// 懒加载的全局 FileService 实例
static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn handle_upload(
    request: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE.handle_upload(&request, payload).await
}

pub async fn list_my_files(request: HttpRequest) -> ActixResult<HttpResponse> {
    FILE_SERVICE.list_my_files(&request).await
}

pub async fn list_pending(
    request: HttpRequest,
    query: web::Query<PendingFileParams>,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE.list_pending(&request, query.into_inner()).await
}

pub async fn get_file(request: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FILE_SERVICE.get_file(&request, id.0).await
}

pub async fn handle_download(request: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FILE_SERVICE.handle_download(&request, id.0).await
}

/// 请求体为空时按申报分值通过，否则必须是合法的 JSON
fn parse_accept_body(body: &[u8]) -> Result<AcceptFileRequest, HttpResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AcceptFileRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Invalid request body: {e}"),
        ))
    })
}

pub async fn accept_file(
    request: HttpRequest,
    id: SafeIDI64,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let accept = match parse_accept_body(&body) {
        Ok(accept) => accept,
        Err(resp) => return Ok(resp),
    };
    FILE_SERVICE.accept_file(&request, id.0, accept).await
}

pub async fn reject_file(
    request: HttpRequest,
    id: SafeIDI64,
    reject: web::Json<RejectFileRequest>,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE
        .reject_file(&request, id.0, reject.into_inner())
        .await
}

pub async fn delete_file(request: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FILE_SERVICE.delete_file(&request, id.0).await
}

// 配置路由
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/files")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/upload")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route(web::post().to(handle_upload)),
            )
            .service(web::resource("/my").route(web::get().to(list_my_files)))
            .service(
                web::resource("/pending")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::get().to(list_pending)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_file))
                    .route(web::delete().to(delete_file)),
            )
            .service(web::resource("/{id}/download").route(web::get().to(handle_download)))
            .service(
                web::resource("/{id}/accept")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::post().to(accept_file)),
            )
            .service(
                web::resource("/{id}/reject")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::post().to(reject_file)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::Principal;
    use crate::models::files::entities::FileStatus;
    use crate::services::test_support::{
        achievement, admin, job, pending_file, request_as, storage, teacher,
    };

    #[test]
    fn test_parse_accept_body() {
        assert_eq!(parse_accept_body(b"").unwrap().score, None);
        assert_eq!(parse_accept_body(b" \n").unwrap().score, None);
        assert_eq!(parse_accept_body(br#"{"score": 2.5}"#).unwrap().score, Some(2.5));
        assert!(parse_accept_body(br#"{"score":"abc"}"#).is_err());
        assert!(parse_accept_body(br#"{"score": 1"#).is_err());
    }

    #[tokio::test]
    async fn test_malformed_accept_body_keeps_file_pending() {
        let storage = storage().await;
        let owner = teacher(&storage, "+998901112233").await;
        let job = job(&storage, owner.id, None).await;
        let achievement = achievement(&storage).await;
        let file = pending_file(&storage, &owner, &job, &achievement).await;
        let reviewer = admin(&storage, "root", UserRole::Admin, None).await;
        let req = request_as(&storage, Principal::Admin(reviewer));

        let resp = accept_file(
            req.clone(),
            SafeIDI64(file.id),
            web::Bytes::from_static(br#"{"score":"abc"}"#),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let stored = storage.get_file_by_id(file.id).await.unwrap().unwrap();
        assert_eq!(stored.status, FileStatus::Pending);

        let resp = accept_file(req, SafeIDI64(file.id), web::Bytes::new())
            .await
            .unwrap();
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        let stored = storage.get_file_by_id(file.id).await.unwrap().unwrap();
        assert_eq!(stored.status, FileStatus::Accepted);
        assert_eq!(stored.inspector_score, Some(5.0));
    }
}
