use serde::Serialize;

use super::entities::Job;
use crate::models::files::entities::SubmittedFile;

// 工作单位详情（含其下提交的文件）
#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    pub job: Job,
    pub files: Vec<SubmittedFile>,
}
