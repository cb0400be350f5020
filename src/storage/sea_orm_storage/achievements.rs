//! 成就类别存储操作

use super::SeaOrmStorage;
use crate::entity::achievements::{ActiveModel, Column, Entity as Achievements};
use crate::entity::files::{Column as FileColumn, Entity as Files};
use crate::errors::{PortfolioError, Result};
use crate::models::achievements::{entities::Achievement, requests::CreateAchievementRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建成就类别
    pub async fn create_achievement_impl(
        &self,
        req: CreateAchievementRequest,
    ) -> Result<Achievement> {
        let now = chrono::Utc::now().timestamp();
        let ratings = serde_json::to_string(&req.ratings)?;

        let model = ActiveModel {
            section: Set(req.section),
            title: Set(req.title),
            ratings: Set(ratings),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("创建成就类别失败: {e}")))?;

        Ok(result.into_achievement())
    }

    /// 通过 ID 获取成就类别
    pub async fn get_achievement_by_id_impl(&self, id: i64) -> Result<Option<Achievement>> {
        let result = Achievements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("查询成就类别失败: {e}")))?;

        Ok(result.map(|m| m.into_achievement()))
    }

    /// 按创建顺序列出全部成就类别
    pub async fn list_achievements_impl(&self) -> Result<Vec<Achievement>> {
        let achievements = Achievements::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                PortfolioError::database_operation(format!("查询成就类别列表失败: {e}"))
            })?;

        Ok(achievements
            .into_iter()
            .map(|m| m.into_achievement())
            .collect())
    }

    /// 删除成就类别及引用它的文件记录
    pub async fn delete_achievement_impl(&self, id: i64) -> Result<bool> {
        Files::delete_many()
            .filter(FileColumn::AchievementId.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                PortfolioError::database_operation(format!("删除成就类别文件失败: {e}"))
            })?;

        let result = Achievements::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("删除成就类别失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 清空成就类别，返回被删除的记录
    pub async fn delete_all_achievements_impl(&self) -> Result<Vec<Achievement>> {
        let existing = self.list_achievements_impl().await?;

        Files::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("清空文件记录失败: {e}")))?;

        Achievements::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("清空成就类别失败: {e}")))?;

        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::models::achievements::entities::RatingOption;
    use crate::models::achievements::requests::CreateAchievementRequest;

    fn olympiad() -> CreateAchievementRequest {
        CreateAchievementRequest {
            section: "Scientific work".to_string(),
            title: "Olympiad winners".to_string(),
            ratings: vec![
                RatingOption {
                    about: "Regional stage".to_string(),
                    rating: Some(5.0),
                },
                RatingOption {
                    about: "National stage".to_string(),
                    rating: Some(10.0),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_ratings_survive_storage() {
        let storage = memory_storage().await;
        let created = storage.create_achievement_impl(olympiad()).await.unwrap();

        let fetched = storage
            .get_achievement_by_id_impl(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.ratings.len(), 2);
        assert_eq!(
            fetched.find_rating("National stage").and_then(|r| r.rating),
            Some(10.0)
        );
    }

    #[tokio::test]
    async fn test_delete_all_returns_removed() {
        let storage = memory_storage().await;
        storage.create_achievement_impl(olympiad()).await.unwrap();
        storage.create_achievement_impl(olympiad()).await.unwrap();

        let removed = storage.delete_all_achievements_impl().await.unwrap();
        assert_eq!(removed.len(), 2);
        assert!(storage.list_achievements_impl().await.unwrap().is_empty());
    }
}
