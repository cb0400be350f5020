use serde::Serialize;

use super::entities::Achievement;

// 成就类别及当前教师在该工作单位下是否已提交
#[derive(Debug, Serialize)]
pub struct AchievementStatus {
    pub exist: bool,
    pub achievement: Achievement,
}

// 按 section 分组
#[derive(Debug, Serialize)]
pub struct SectionAchievements {
    pub section: String,
    pub achievements: Vec<AchievementStatus>,
}
