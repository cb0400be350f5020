use serde::Deserialize;

// 教师登录请求
#[derive(Debug, Deserialize)]
pub struct TeacherLoginRequest {
    pub phone: String,
    pub password: String,
}

// 管理员/检查员登录请求
#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}
