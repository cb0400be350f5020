use serde::{Deserialize, Serialize};

// 工作单位（教师的任职信息）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub workplace: String,
    pub region: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
