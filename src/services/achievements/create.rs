use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AchievementService;
use crate::models::{ApiResponse, ErrorCode, achievements::requests::CreateAchievementRequest};
use crate::services::internal_error;
use crate::utils::validate::validate_required_text;

fn normalize(achievement: &mut CreateAchievementRequest) -> Result<(), String> {
    achievement.section = achievement.section.trim().to_string();
    achievement.title = achievement.title.trim().to_string();
    validate_required_text(&achievement.section, "section")?;
    validate_required_text(&achievement.title, "title")?;

    for option in achievement.ratings.iter_mut() {
        option.about = option.about.trim().to_string();
        validate_required_text(&option.about, "rating about")?;
        if let Some(rating) = option.rating
            && (!rating.is_finite() || rating < 0.0)
        {
            return Err(format!("rating for '{}' must be a non-negative number", option.about));
        }
    }

    let mut seen = std::collections::HashSet::new();
    if let Some(dup) = achievement
        .ratings
        .iter()
        .find(|o| !seen.insert(o.about.as_str()))
    {
        return Err(format!("rating '{}' is listed twice", dup.about));
    }

    Ok(())
}

pub async fn create_achievement(
    service: &AchievementService,
    mut achievement: CreateAchievementRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = normalize(&mut achievement) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AchievementInvalid, msg)));
    }

    match service
        .get_storage(request)
        .create_achievement(achievement)
        .await
    {
        Ok(created) => Ok(HttpResponse::Created().json(ApiResponse::success(
            created,
            "Achievement created successfully",
        ))),
        Err(e) => Ok(internal_error(format!("Achievement creation failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::achievements::entities::RatingOption;

    fn request(ratings: Vec<RatingOption>) -> CreateAchievementRequest {
        CreateAchievementRequest {
            section: "  Scientific work ".to_string(),
            title: "Conference talks".to_string(),
            ratings,
        }
    }

    fn option(about: &str, rating: Option<f64>) -> RatingOption {
        RatingOption {
            about: about.to_string(),
            rating,
        }
    }

    #[test]
    fn test_trims_and_accepts() {
        let mut req = request(vec![option(" International ", Some(8.0)), option("Local", None)]);
        assert!(normalize(&mut req).is_ok());
        assert_eq!(req.section, "Scientific work");
        assert_eq!(req.ratings[0].about, "International");
    }

    #[test]
    fn test_rejects_negative_and_duplicates() {
        assert!(normalize(&mut request(vec![option("Local", Some(-1.0))])).is_err());
        assert!(normalize(&mut request(vec![option("Local", Some(1.0)), option("Local ", Some(2.0))])).is_err());
    }
}
