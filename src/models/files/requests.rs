use serde::Deserialize;

use super::entities::FileStatus;
use crate::models::common::PaginationQuery;

// 审核通过请求
#[derive(Debug, Default, Deserialize)]
pub struct AcceptFileRequest {
    /// 不填则采用教师申报的分值
    pub score: Option<f64>,
    pub message: Option<String>,
}

// 驳回请求
#[derive(Debug, Deserialize)]
pub struct RejectFileRequest {
    pub message: String,
}

// 待审核列表查询
#[derive(Debug, Deserialize)]
pub struct PendingFileParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
}

// 分数汇总查询
#[derive(Debug, Default, Deserialize)]
pub struct ScoreQuery {
    pub job_id: Option<i64>,
}

// 上传表单解析结果，写入前由服务层补齐快照字段
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub title: String,
    pub stored_name: String,
    pub original_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub teacher_id: i64,
    pub teacher_first_name: String,
    pub teacher_last_name: String,
    pub job_id: i64,
    pub job_title: String,
    pub job_workplace: String,
    pub region: Option<String>,
    pub achievement_id: i64,
    pub achievement_title: String,
    pub achievement_section: String,
    pub rating_title: String,
    pub rating: f64,
}

// 审核决定（存储层仅在状态为 pending 时写入）
#[derive(Debug, Clone)]
pub struct ReviewDecision {
    pub status: FileStatus,
    pub inspector_score: Option<f64>,
    pub message: Option<String>,
    pub reviewer_id: i64,
}
