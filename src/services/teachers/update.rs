use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::models::{ApiResponse, ErrorCode, teachers::requests::UpdateTeacherRequest};
use crate::services::{forbidden, require_principal};
use crate::utils::validate::{normalize_phone, validate_person_name, validate_phone};

pub async fn update_teacher(
    service: &TeacherService,
    id: i64,
    mut update: UpdateTeacherRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    if !principal.can_manage_teacher(id) {
        return Ok(forbidden("You can only update your own profile"));
    }

    // 密码只能走修改密码接口
    if update.password.is_some() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordChangeNotAllowed,
            "Password cannot be changed here, use the change password endpoint",
        )));
    }

    for name in [&mut update.first_name, &mut update.last_name]
        .into_iter()
        .flatten()
    {
        *name = name.trim().to_string();
        if let Err(msg) = validate_person_name(name) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::TeacherNameInvalid, msg)));
        }
    }

    let storage = service.get_storage(request);

    if let Some(phone) = update.phone.as_mut() {
        *phone = normalize_phone(phone);
        if let Err(msg) = validate_phone(phone) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::TeacherPhoneInvalid, msg)));
        }

        match storage.get_teacher_by_phone(phone).await {
            Ok(Some(other)) if other.id != id => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::TeacherPhoneAlreadyExists,
                    "A teacher with this phone number already exists",
                )));
            }
            Ok(_) => {}
            Err(e) => {
                return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::TeacherUpdateFailed,
                    format!("Teacher update failed: {e}"),
                )));
            }
        }
    }

    match storage.update_teacher(id, update).await {
        Ok(Some(teacher)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            teacher,
            "Teacher updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TeacherNotFound,
            "Teacher not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::TeacherUpdateFailed,
                format!("Teacher update failed: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use crate::models::auth::entities::Principal;
    use crate::models::teachers::requests::UpdateTeacherRequest;
    use crate::services::TeacherService;
    use crate::services::test_support::{request_as, storage, teacher};
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_password_field_is_rejected() {
        let storage = storage().await;
        let me = teacher(&storage, "+998901112233").await;
        let req = request_as(&storage, Principal::Teacher(me.clone()));

        let resp = TeacherService::new_lazy()
            .update_teacher(
                &req,
                me.id,
                UpdateTeacherRequest {
                    first_name: Some("Lola".to_string()),
                    password: Some("Secret123".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let stored = storage.get_teacher_by_id(me.id).await.unwrap().unwrap();
        assert_eq!(stored.first_name, me.first_name);
    }

    #[tokio::test]
    async fn test_phone_taken_by_other_teacher_conflicts() {
        let storage = storage().await;
        let me = teacher(&storage, "+998901112233").await;
        let other = teacher(&storage, "+998907778899").await;
        let req = request_as(&storage, Principal::Teacher(me.clone()));
        let service = TeacherService::new_lazy();

        let resp = service
            .update_teacher(
                &req,
                me.id,
                UpdateTeacherRequest {
                    phone: Some("+998 90 777-88-99".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        // 保持自己的号码不算冲突
        let resp = service
            .update_teacher(
                &req,
                me.id,
                UpdateTeacherRequest {
                    phone: Some(me.phone.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = service
            .update_teacher(
                &req,
                other.id,
                UpdateTeacherRequest {
                    first_name: Some("Mallory".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
