use serde::{Deserialize, Serialize};

// 成就类别下的一个评分项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingOption {
    pub about: String,
    pub rating: Option<f64>,
}

// 成就类别
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub section: String,
    pub title: String,
    pub ratings: Vec<RatingOption>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Achievement {
    /// 按 `about` 查找评分项（忽略首尾空白）
    pub fn find_rating(&self, about: &str) -> Option<&RatingOption> {
        let about = about.trim();
        self.ratings.iter().find(|r| r.about.trim() == about)
    }
}
