use serde::Deserialize;

use crate::models::auth::entities::UserRole;

// 创建管理员/检查员；存储层收到时 password 已是哈希
#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    pub username: String,
    pub password: String,
    pub role: UserRole,
    pub region: Option<String>,
}

// 更新管理员/检查员
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAdminRequest {
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub region: Option<String>,
}
