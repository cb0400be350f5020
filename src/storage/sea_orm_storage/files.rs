//! 提交文件存储操作

use super::SeaOrmStorage;
use crate::entity::files::{ActiveModel, Column, Entity as Files};
use crate::errors::{PortfolioError, Result};
use crate::models::{
    PaginationInfo, PaginationQuery,
    files::{
        entities::{FileStatus, SubmittedFile},
        requests::{NewFileRecord, ReviewDecision},
        responses::FileListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 写入文件记录，状态固定为 pending
    pub async fn create_file_impl(&self, record: NewFileRecord) -> Result<SubmittedFile> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(record.title),
            stored_name: Set(record.stored_name),
            original_name: Set(record.original_name),
            file_size: Set(record.file_size),
            file_type: Set(record.file_type),
            teacher_id: Set(record.teacher_id),
            teacher_first_name: Set(record.teacher_first_name),
            teacher_last_name: Set(record.teacher_last_name),
            job_id: Set(record.job_id),
            job_title: Set(record.job_title),
            job_workplace: Set(record.job_workplace),
            region: Set(record.region),
            achievement_id: Set(record.achievement_id),
            achievement_title: Set(record.achievement_title),
            achievement_section: Set(record.achievement_section),
            rating_title: Set(record.rating_title),
            rating: Set(record.rating),
            status: Set(FileStatus::Pending.to_string()),
            result_message: Set(None),
            inspector_score: Set(None),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("创建文件记录失败: {e}")))?;

        Ok(result.into_file())
    }

    /// 通过 ID 获取文件
    pub async fn get_file_by_id_impl(&self, id: i64) -> Result<Option<SubmittedFile>> {
        let result = Files::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("查询文件失败: {e}")))?;

        Ok(result.map(|m| m.into_file()))
    }

    async fn list_files_where(&self, filter: Column, value: i64) -> Result<Vec<SubmittedFile>> {
        let files = Files::find()
            .filter(filter.eq(value))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("查询文件列表失败: {e}")))?;

        Ok(files.into_iter().map(|m| m.into_file()).collect())
    }

    /// 教师的全部文件，最新在前
    pub async fn list_files_by_teacher_impl(&self, teacher_id: i64) -> Result<Vec<SubmittedFile>> {
        self.list_files_where(Column::TeacherId, teacher_id).await
    }

    /// 工作单位下的全部文件
    pub async fn list_files_by_job_impl(&self, job_id: i64) -> Result<Vec<SubmittedFile>> {
        self.list_files_where(Column::JobId, job_id).await
    }

    /// 引用某成就类别的全部文件
    pub async fn list_files_by_achievement_impl(
        &self,
        achievement_id: i64,
    ) -> Result<Vec<SubmittedFile>> {
        self.list_files_where(Column::AchievementId, achievement_id)
            .await
    }

    /// 待审核文件，最早提交的在前
    pub async fn list_pending_files_with_pagination_impl(
        &self,
        region: Option<&str>,
        query: PaginationQuery,
    ) -> Result<FileListResponse> {
        let (page, size) = query.normalized();

        let mut select = Files::find().filter(Column::Status.eq(FileStatus::PENDING));
        if let Some(region) = region {
            select = select.filter(Column::Region.eq(region));
        }

        let paginator = select
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortfolioError::database_operation(format!("查询文件总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortfolioError::database_operation(format!("查询文件页数失败: {e}")))?;
        let files = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("查询待审核文件失败: {e}")))?;

        Ok(FileListResponse {
            items: files.into_iter().map(|m| m.into_file()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 审核文件
    ///
    /// 条件更新：只有 status 仍为 pending 的行会被修改，
    /// 并发的两次审核只有一次生效。未命中时返回 None。
    pub async fn review_file_impl(
        &self,
        id: i64,
        decision: ReviewDecision,
    ) -> Result<Option<SubmittedFile>> {
        let now = chrono::Utc::now().timestamp();

        let result = Files::update_many()
            .col_expr(Column::Status, Expr::value(decision.status.to_string()))
            .col_expr(Column::InspectorScore, Expr::value(decision.inspector_score))
            .col_expr(Column::ResultMessage, Expr::value(decision.message))
            .col_expr(Column::ReviewedBy, Expr::value(Some(decision.reviewer_id)))
            .col_expr(Column::ReviewedAt, Expr::value(Some(now)))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(FileStatus::PENDING))
            .exec(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("审核文件失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_file_by_id_impl(id).await
    }

    /// 删除文件记录
    pub async fn delete_file_impl(&self, id: i64) -> Result<bool> {
        let result = Files::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("删除文件记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 删除仍待审核的文件，与审核写入互斥
    pub async fn delete_pending_file_impl(&self, id: i64) -> Result<bool> {
        let result = Files::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(FileStatus::PENDING))
            .exec(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("删除文件记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::SeaOrmStorage;
    use super::super::test_support::memory_storage;
    use crate::models::PaginationQuery;
    use crate::models::achievements::entities::RatingOption;
    use crate::models::achievements::requests::CreateAchievementRequest;
    use crate::models::files::entities::FileStatus;
    use crate::models::files::requests::{NewFileRecord, ReviewDecision};
    use crate::models::jobs::requests::CreateJobRequest;
    use crate::models::teachers::requests::CreateTeacherRequest;

    struct Fixture {
        storage: SeaOrmStorage,
        teacher_id: i64,
        job_id: i64,
        achievement_id: i64,
    }

    async fn fixture() -> Fixture {
        let storage = memory_storage().await;
        let teacher = storage
            .create_teacher_impl(CreateTeacherRequest {
                first_name: "Aziz".to_string(),
                last_name: "Rahimov".to_string(),
                phone: "+998971234567".to_string(),
                password: "hash".to_string(),
            })
            .await
            .unwrap();
        let job = storage
            .create_job_impl(
                teacher.id,
                CreateJobRequest {
                    title: "Physics teacher".to_string(),
                    workplace: "School 4".to_string(),
                    region: Some("Bukhara".to_string()),
                },
            )
            .await
            .unwrap();
        let achievement = storage
            .create_achievement_impl(CreateAchievementRequest {
                section: "Methodology".to_string(),
                title: "Published articles".to_string(),
                ratings: vec![RatingOption {
                    about: "Local journal".to_string(),
                    rating: Some(3.0),
                }],
            })
            .await
            .unwrap();

        Fixture {
            storage,
            teacher_id: teacher.id,
            job_id: job.id,
            achievement_id: achievement.id,
        }
    }

    fn record(f: &Fixture, region: Option<&str>) -> NewFileRecord {
        NewFileRecord {
            title: "Article".to_string(),
            stored_name: format!("{}.pdf", uuid::Uuid::new_v4()),
            original_name: "article.pdf".to_string(),
            file_size: 1024,
            file_type: ".pdf".to_string(),
            teacher_id: f.teacher_id,
            teacher_first_name: "Aziz".to_string(),
            teacher_last_name: "Rahimov".to_string(),
            job_id: f.job_id,
            job_title: "Physics teacher".to_string(),
            job_workplace: "School 4".to_string(),
            region: region.map(str::to_string),
            achievement_id: f.achievement_id,
            achievement_title: "Published articles".to_string(),
            achievement_section: "Methodology".to_string(),
            rating_title: "Local journal".to_string(),
            rating: 3.0,
        }
    }

    fn accept(reviewer_id: i64) -> ReviewDecision {
        ReviewDecision {
            status: FileStatus::Accepted,
            inspector_score: Some(2.5),
            message: None,
            reviewer_id,
        }
    }

    #[tokio::test]
    async fn test_review_only_applies_once() {
        let f = fixture().await;
        let file = f.storage.create_file_impl(record(&f, None)).await.unwrap();
        assert_eq!(file.status, FileStatus::Pending);
        assert_eq!(file.file_url, format!("/api/v1/files/{}/download", file.id));

        let reviewed = f
            .storage
            .review_file_impl(file.id, accept(1))
            .await
            .unwrap()
            .expect("pending file should be reviewed");
        assert_eq!(reviewed.status, FileStatus::Accepted);
        assert_eq!(reviewed.inspector_score, Some(2.5));
        assert_eq!(reviewed.reviewed_by, Some(1));
        assert!(reviewed.reviewed_at.is_some());

        let second = f
            .storage
            .review_file_impl(
                file.id,
                ReviewDecision {
                    status: FileStatus::Rejected,
                    inspector_score: None,
                    message: Some("late".to_string()),
                    reviewer_id: 2,
                },
            )
            .await
            .unwrap();
        assert!(second.is_none());

        let stored = f.storage.get_file_by_id_impl(file.id).await.unwrap().unwrap();
        assert_eq!(stored.status, FileStatus::Accepted);
    }

    #[tokio::test]
    async fn test_pending_list_filters_by_region() {
        let f = fixture().await;
        f.storage
            .create_file_impl(record(&f, Some("Bukhara")))
            .await
            .unwrap();
        f.storage
            .create_file_impl(record(&f, Some("Andijan")))
            .await
            .unwrap();
        let reviewed = f
            .storage
            .create_file_impl(record(&f, Some("Bukhara")))
            .await
            .unwrap();
        f.storage
            .review_file_impl(reviewed.id, accept(1))
            .await
            .unwrap();

        let all = f
            .storage
            .list_pending_files_with_pagination_impl(None, PaginationQuery::default())
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);

        let bukhara = f
            .storage
            .list_pending_files_with_pagination_impl(Some("Bukhara"), PaginationQuery::default())
            .await
            .unwrap();
        assert_eq!(bukhara.items.len(), 1);
        assert_eq!(bukhara.items[0].region.as_deref(), Some("Bukhara"));
    }

    #[tokio::test]
    async fn test_deleting_job_removes_its_files() {
        let f = fixture().await;
        let file = f.storage.create_file_impl(record(&f, None)).await.unwrap();

        assert!(f.storage.delete_job_impl(f.job_id).await.unwrap());
        assert!(f.storage.get_file_by_id_impl(file.id).await.unwrap().is_none());
        assert!(
            f.storage
                .list_files_by_teacher_impl(f.teacher_id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_deleting_teacher_cascades() {
        let f = fixture().await;
        f.storage.create_file_impl(record(&f, None)).await.unwrap();

        assert!(f.storage.delete_teacher_impl(f.teacher_id).await.unwrap());
        assert!(f.storage.get_job_by_id_impl(f.job_id).await.unwrap().is_none());
        assert!(
            f.storage
                .list_files_by_achievement_impl(f.achievement_id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_delete_pending_skips_reviewed_files() {
        let f = fixture().await;
        let pending = f.storage.create_file_impl(record(&f, None)).await.unwrap();
        let reviewed = f.storage.create_file_impl(record(&f, None)).await.unwrap();
        f.storage
            .review_file_impl(reviewed.id, accept(1))
            .await
            .unwrap();

        assert!(!f.storage.delete_pending_file_impl(reviewed.id).await.unwrap());
        assert!(f.storage.get_file_by_id_impl(reviewed.id).await.unwrap().is_some());

        assert!(f.storage.delete_pending_file_impl(pending.id).await.unwrap());
        assert!(f.storage.get_file_by_id_impl(pending.id).await.unwrap().is_none());
    }
}
