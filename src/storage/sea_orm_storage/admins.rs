//! 管理员/检查员存储操作

use super::SeaOrmStorage;
use crate::entity::admins::{ActiveModel, Column, Entity as Admins};
use crate::errors::{PortfolioError, Result};
use crate::models::admins::{
    entities::Admin,
    requests::{CreateAdminRequest, UpdateAdminRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建管理员
    pub async fn create_admin_impl(&self, req: CreateAdminRequest) -> Result<Admin> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            region: Set(req.region),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("创建管理员失败: {e}")))?;

        Ok(result.into_admin())
    }

    /// 通过 ID 获取管理员
    pub async fn get_admin_by_id_impl(&self, id: i64) -> Result<Option<Admin>> {
        let result = Admins::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("查询管理员失败: {e}")))?;

        Ok(result.map(|m| m.into_admin()))
    }

    /// 通过用户名获取管理员
    pub async fn get_admin_by_username_impl(&self, username: &str) -> Result<Option<Admin>> {
        let result = Admins::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("查询管理员失败: {e}")))?;

        Ok(result.map(|m| m.into_admin()))
    }

    /// 列出全部管理员
    pub async fn list_admins_impl(&self) -> Result<Vec<Admin>> {
        let admins = Admins::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("查询管理员列表失败: {e}")))?;

        Ok(admins.into_iter().map(|m| m.into_admin()).collect())
    }

    /// 更新管理员
    pub async fn update_admin_impl(
        &self,
        id: i64,
        update: UpdateAdminRequest,
    ) -> Result<Option<Admin>> {
        if self.get_admin_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(password_hash) = update.password {
            model.password_hash = Set(password_hash);
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(region) = update.region {
            // 空字符串表示清除地区
            model.region = Set(Some(region).filter(|r| !r.trim().is_empty()));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("更新管理员失败: {e}")))?;

        self.get_admin_by_id_impl(id).await
    }

    /// 删除管理员
    pub async fn delete_admin_impl(&self, id: i64) -> Result<bool> {
        let result = Admins::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("删除管理员失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 记录最后登录时间
    pub async fn update_admin_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let result = Admins::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                PortfolioError::database_operation(format!("更新管理员登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 管理员总数
    pub async fn count_admins_impl(&self) -> Result<u64> {
        Admins::find()
            .count(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("统计管理员数量失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::models::admins::requests::{CreateAdminRequest, UpdateAdminRequest};
    use crate::models::auth::entities::UserRole;

    #[tokio::test]
    async fn test_admin_lifecycle() {
        let storage = memory_storage().await;
        assert_eq!(storage.count_admins_impl().await.unwrap(), 0);

        let inspector = storage
            .create_admin_impl(CreateAdminRequest {
                username: "samarkand_inspector".to_string(),
                password: "hash".to_string(),
                role: UserRole::Inspector,
                region: Some("Samarkand".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(inspector.role, UserRole::Inspector);
        assert_eq!(storage.count_admins_impl().await.unwrap(), 1);

        let promoted = storage
            .update_admin_impl(
                inspector.id,
                UpdateAdminRequest {
                    role: Some(UserRole::Admin),
                    region: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(promoted.role, UserRole::Admin);
        assert!(promoted.region.is_none());

        assert!(storage.update_admin_last_login_impl(inspector.id).await.unwrap());
        let fetched = storage
            .get_admin_by_username_impl("samarkand_inspector")
            .await
            .unwrap()
            .unwrap();
        assert!(fetched.last_login.is_some());

        assert!(storage.delete_admin_impl(inspector.id).await.unwrap());
        assert!(!storage.delete_admin_impl(inspector.id).await.unwrap());
    }
}
