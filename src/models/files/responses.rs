use serde::Serialize;

use super::entities::SubmittedFile;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub items: Vec<SubmittedFile>,
    pub pagination: PaginationInfo,
}

// 某 section 下的得分
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionScore {
    pub section: String,
    pub accepted: u32,
    pub score: f64,
}

// 教师（可选限定某工作单位）的得分汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub teacher_id: i64,
    pub job_id: Option<i64>,
    pub pending: u32,
    pub accepted: u32,
    pub rejected: u32,
    /// 待审核 + 已通过文件的申报分值之和
    pub claimed: f64,
    /// 已通过文件的审核分值之和
    pub total_score: f64,
    pub sections: Vec<SectionScore>,
}
