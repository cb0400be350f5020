use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;

use super::AchievementService;
use crate::models::ApiResponse;
use crate::models::achievements::{
    entities::Achievement,
    responses::{AchievementStatus, SectionAchievements},
};
use crate::services::jobs::load_job_for;
use crate::services::{internal_error, require_principal};

/// 按 section 分组
///
/// section 按首次出现的顺序排列，组内保持输入顺序；
/// `submitted` 中出现的成就类别标记为已提交。
pub fn group_by_section(
    achievements: Vec<Achievement>,
    submitted: &HashSet<i64>,
) -> Vec<SectionAchievements> {
    let mut groups: Vec<SectionAchievements> = Vec::new();

    for achievement in achievements {
        let status = AchievementStatus {
            exist: submitted.contains(&achievement.id),
            achievement,
        };
        match groups
            .iter_mut()
            .find(|g| g.section == status.achievement.section)
        {
            Some(group) => group.achievements.push(status),
            None => groups.push(SectionAchievements {
                section: status.achievement.section.clone(),
                achievements: vec![status],
            }),
        }
    }

    groups
}

pub async fn list_achievements(
    service: &AchievementService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).list_achievements().await {
        Ok(achievements) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            achievements,
            "Achievements retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!("Failed to retrieve achievements: {e}"))),
    }
}

pub async fn list_for_job(
    service: &AchievementService,
    job_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let job = match load_job_for(&storage, &principal, job_id, false).await {
        Ok(job) => job,
        Err(resp) => return Ok(resp),
    };

    let submitted: HashSet<i64> = match storage.list_files_by_job(job.id).await {
        Ok(files) => files.iter().map(|f| f.achievement_id).collect(),
        Err(e) => return Ok(internal_error(format!("Failed to retrieve job files: {e}"))),
    };

    match storage.list_achievements().await {
        Ok(achievements) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            group_by_section(achievements, &submitted),
            "Achievements retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!("Failed to retrieve achievements: {e}"))),
    }
}
