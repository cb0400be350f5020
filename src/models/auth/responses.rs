use serde::Serialize;

use crate::models::admins::entities::Admin;
use crate::models::auth::entities::Principal;
use crate::models::teachers::entities::Teacher;

// 教师注册/登录响应
#[derive(Debug, Serialize)]
pub struct TeacherAuthResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub teacher: Teacher,
}

// 管理员登录响应
#[derive(Debug, Serialize)]
pub struct AdminAuthResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub admin: Admin,
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub principal: Principal,
}
