use serde::Serialize;

use super::entities::Teacher;
use crate::models::common::PaginationInfo;

// 教师列表响应
#[derive(Debug, Serialize)]
pub struct TeacherListResponse {
    pub items: Vec<Teacher>,
    pub pagination: PaginationInfo,
}
