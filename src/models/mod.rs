pub mod achievements;
pub mod admins;
pub mod auth;
pub mod common;
pub mod error_code;
pub mod files;
pub mod jobs;
pub mod teachers;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};
pub use error_code::ErrorCode;

/// 进程启动时间，挂在 app_data 上
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
