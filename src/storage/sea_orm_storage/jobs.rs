//! 工作单位存储操作

use super::SeaOrmStorage;
use crate::entity::files::{Column as FileColumn, Entity as Files};
use crate::entity::jobs::{ActiveModel, Column, Entity as Jobs};
use crate::errors::{PortfolioError, Result};
use crate::models::jobs::{
    entities::Job,
    requests::{CreateJobRequest, UpdateJobRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

/// 地区按精确值匹配检查员，入库前去掉首尾空白
fn normalize_region(region: Option<String>) -> Option<String> {
    region
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}

impl SeaOrmStorage {
    /// 创建工作单位
    pub async fn create_job_impl(&self, teacher_id: i64, req: CreateJobRequest) -> Result<Job> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            title: Set(req.title),
            workplace: Set(req.workplace),
            region: Set(normalize_region(req.region)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("创建工作单位失败: {e}")))?;

        Ok(result.into_job())
    }

    /// 通过 ID 获取工作单位
    pub async fn get_job_by_id_impl(&self, id: i64) -> Result<Option<Job>> {
        let result = Jobs::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("查询工作单位失败: {e}")))?;

        Ok(result.map(|m| m.into_job()))
    }

    /// 列出教师的工作单位
    pub async fn list_jobs_by_teacher_impl(&self, teacher_id: i64) -> Result<Vec<Job>> {
        let jobs = Jobs::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                PortfolioError::database_operation(format!("查询工作单位列表失败: {e}"))
            })?;

        Ok(jobs.into_iter().map(|m| m.into_job()).collect())
    }

    /// 更新工作单位
    pub async fn update_job_impl(&self, id: i64, update: UpdateJobRequest) -> Result<Option<Job>> {
        if self.get_job_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(workplace) = update.workplace {
            model.workplace = Set(workplace);
        }
        if let Some(region) = update.region {
            // 空字符串表示清除地区
            model.region = Set(normalize_region(Some(region)));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("更新工作单位失败: {e}")))?;

        self.get_job_by_id_impl(id).await
    }

    /// 删除工作单位及其文件记录
    pub async fn delete_job_impl(&self, id: i64) -> Result<bool> {
        Files::delete_many()
            .filter(FileColumn::JobId.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                PortfolioError::database_operation(format!("删除工作单位文件失败: {e}"))
            })?;

        let result = Jobs::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("删除工作单位失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
