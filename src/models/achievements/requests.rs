use serde::Deserialize;

use super::entities::RatingOption;

#[derive(Debug, Deserialize)]
pub struct CreateAchievementRequest {
    pub section: String,
    pub title: String,
    #[serde(default)]
    pub ratings: Vec<RatingOption>,
}
