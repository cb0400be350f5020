use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FileService;
use crate::models::{
    ApiResponse,
    files::{
        entities::{FileStatus, SubmittedFile},
        requests::ScoreQuery,
        responses::{ScoreSummary, SectionScore},
    },
};
use crate::services::{forbidden, internal_error, require_principal};

/// 汇总教师的文件得分
///
/// 已驳回的文件只计数；`claimed` 统计待审核与已通过文件的申报分值，
/// `total_score` 与各 section 得分只统计已通过文件的审核分值。
pub fn aggregate_scores(
    teacher_id: i64,
    job_id: Option<i64>,
    files: &[SubmittedFile],
) -> ScoreSummary {
    let mut summary = ScoreSummary {
        teacher_id,
        job_id,
        pending: 0,
        accepted: 0,
        rejected: 0,
        claimed: 0.0,
        total_score: 0.0,
        sections: Vec::new(),
    };

    for file in files.iter().filter(|f| job_id.is_none_or(|id| f.job_id == id)) {
        match file.status {
            FileStatus::Pending => {
                summary.pending += 1;
                summary.claimed += file.rating;
            }
            FileStatus::Rejected => summary.rejected += 1,
            FileStatus::Accepted => {
                let score = file.inspector_score.unwrap_or(file.rating);
                summary.accepted += 1;
                summary.claimed += file.rating;
                summary.total_score += score;

                match summary
                    .sections
                    .iter_mut()
                    .find(|s| s.section == file.achievement_section)
                {
                    Some(section) => {
                        section.accepted += 1;
                        section.score += score;
                    }
                    None => summary.sections.push(SectionScore {
                        section: file.achievement_section.clone(),
                        accepted: 1,
                        score,
                    }),
                }
            }
        }
    }

    summary
}

pub async fn teacher_score(
    service: &FileService,
    teacher_id: i64,
    query: ScoreQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };
    if !principal.can_view_teacher(teacher_id) {
        return Ok(forbidden("You can only view your own score"));
    }

    match service.get_storage(request).list_files_by_teacher(teacher_id).await {
        Ok(files) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            aggregate_scores(teacher_id, query.job_id, &files),
            "Score retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!("Failed to retrieve files: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn file(
        job_id: i64,
        section: &str,
        status: FileStatus,
        rating: f64,
        inspector_score: Option<f64>,
    ) -> SubmittedFile {
        SubmittedFile {
            id: 1,
            title: "Certificate".to_string(),
            file_url: SubmittedFile::download_url(1),
            stored_name: "x.pdf".to_string(),
            original_name: "certificate.pdf".to_string(),
            file_size: 10,
            file_type: ".pdf".to_string(),
            teacher_id: 5,
            teacher_first_name: "Malika".to_string(),
            teacher_last_name: "Yusupova".to_string(),
            job_id,
            job_title: "Teacher".to_string(),
            job_workplace: "School 1".to_string(),
            region: None,
            achievement_id: 1,
            achievement_title: "Courses".to_string(),
            achievement_section: section.to_string(),
            rating_title: "Completed".to_string(),
            rating,
            status,
            result_message: None,
            inspector_score,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_aggregate() {
        let files = vec![
            file(1, "Training", FileStatus::Accepted, 5.0, Some(4.0)),
            file(1, "Olympiads", FileStatus::Accepted, 10.0, None),
            file(1, "Training", FileStatus::Accepted, 3.0, Some(3.0)),
            file(1, "Training", FileStatus::Pending, 2.0, None),
            file(2, "Training", FileStatus::Rejected, 8.0, None),
        ];

        let summary = aggregate_scores(5, None, &files);
        assert_eq!((summary.accepted, summary.pending, summary.rejected), (3, 1, 1));
        assert_eq!(summary.claimed, 20.0);
        assert_eq!(summary.total_score, 17.0);
        assert_eq!(
            summary.sections,
            vec![
                SectionScore {
                    section: "Training".to_string(),
                    accepted: 2,
                    score: 7.0
                },
                SectionScore {
                    section: "Olympiads".to_string(),
                    accepted: 1,
                    score: 10.0
                },
            ]
        );
    }

    #[test]
    fn test_filter_by_job() {
        let files = vec![
            file(1, "Training", FileStatus::Accepted, 5.0, Some(5.0)),
            file(2, "Training", FileStatus::Rejected, 8.0, None),
        ];
        let summary = aggregate_scores(5, Some(2), &files);
        assert_eq!(summary.accepted, 0);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.total_score, 0.0);
        assert!(summary.sections.is_empty());
    }
}
