use serde::{Deserialize, Serialize};

// 提交文件的审核状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Pending,  // 待审核
    Accepted, // 已通过
    Rejected, // 未通过
}

impl FileStatus {
    pub const PENDING: &'static str = "pending";
    pub const ACCEPTED: &'static str = "accepted";
    pub const REJECTED: &'static str = "rejected";

    /// 只有待审核的文件可以被通过或驳回
    pub fn can_transition_to(&self, next: FileStatus) -> bool {
        matches!(
            (self, next),
            (FileStatus::Pending, FileStatus::Accepted) | (FileStatus::Pending, FileStatus::Rejected)
        )
    }
}

impl<'de> Deserialize<'de> for FileStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<FileStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid file status: '{s}'. Supported: pending, accepted, rejected"
            ))
        })
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Pending => write!(f, "{}", FileStatus::PENDING),
            FileStatus::Accepted => write!(f, "{}", FileStatus::ACCEPTED),
            FileStatus::Rejected => write!(f, "{}", FileStatus::REJECTED),
        }
    }
}

impl std::str::FromStr for FileStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            FileStatus::PENDING => Ok(FileStatus::Pending),
            FileStatus::ACCEPTED => Ok(FileStatus::Accepted),
            FileStatus::REJECTED => Ok(FileStatus::Rejected),
            _ => Err(format!("Invalid file status: {s}")),
        }
    }
}

// 提交文件
//
// teacher_* / job_* / achievement_* 是上传时的快照，之后不随源记录变化。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedFile {
    pub id: i64,
    pub title: String,
    pub file_url: String,
    #[serde(skip_serializing, default)]
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
    /// 教师申报的分值
    pub rating: f64,
    pub status: FileStatus,
    pub result_message: Option<String>,
    /// 审核通过时检查员给出的分值
    pub inspector_score: Option<f64>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl SubmittedFile {
    pub fn download_url(id: i64) -> String {
        format!("/api/v1/files/{id}/download")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        assert!(FileStatus::Pending.can_transition_to(FileStatus::Accepted));
        assert!(FileStatus::Pending.can_transition_to(FileStatus::Rejected));
        assert!(!FileStatus::Pending.can_transition_to(FileStatus::Pending));
        assert!(!FileStatus::Accepted.can_transition_to(FileStatus::Rejected));
        assert!(!FileStatus::Rejected.can_transition_to(FileStatus::Accepted));
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&FileStatus::Accepted).unwrap(),
            "\"accepted\""
        );
        let parsed: FileStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(parsed, FileStatus::Rejected);
        assert!(serde_json::from_str::<FileStatus>("\"approved\"").is_err());
    }
}
