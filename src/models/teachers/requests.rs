use serde::Deserialize;

use crate::models::common::PaginationQuery;

// 教师注册请求；存储层收到时 password 已是哈希
#[derive(Debug, Deserialize)]
pub struct CreateTeacherRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub password: String,
}

// 教师资料更新请求
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTeacherRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    /// 仅用于拒绝：密码只能通过修改密码接口更改
    #[serde(default)]
    pub password: Option<String>,
}

// 修改密码请求
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

// 教师列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct TeacherListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 教师列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct TeacherListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
}

impl From<TeacherListParams> for TeacherListQuery {
    fn from(params: TeacherListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
        }
    }
}
