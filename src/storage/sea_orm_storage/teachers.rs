//! 教师存储操作

use super::SeaOrmStorage;
use crate::entity::files::{Column as FileColumn, Entity as Files};
use crate::entity::jobs::{Column as JobColumn, Entity as Jobs};
use crate::entity::teachers::{ActiveModel, Column, Entity as Teachers};
use crate::errors::{PortfolioError, Result};
use crate::models::{
    PaginationInfo,
    teachers::{
        entities::Teacher,
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
        responses::TeacherListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建教师
    pub async fn create_teacher_impl(&self, req: CreateTeacherRequest) -> Result<Teacher> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            phone: Set(req.phone),
            password_hash: Set(req.password),
            profile_image: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("创建教师失败: {e}")))?;

        Ok(result.into_teacher())
    }

    /// 通过 ID 获取教师
    pub async fn get_teacher_by_id_impl(&self, id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    /// 通过手机号获取教师
    pub async fn get_teacher_by_phone_impl(&self, phone: &str) -> Result<Option<Teacher>> {
        let result = Teachers::find()
            .filter(Column::Phone.eq(phone))
            .one(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    /// 分页列出教师
    pub async fn list_teachers_with_pagination_impl(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Teachers::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::FirstName.contains(search))
                    .add(Column::LastName.contains(search))
                    .add(Column::Phone.contains(search)),
            );
        }

        let paginator = select.order_by_asc(Column::Id).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortfolioError::database_operation(format!("查询教师总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortfolioError::database_operation(format!("查询教师页数失败: {e}")))?;
        let teachers = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("查询教师列表失败: {e}")))?;

        Ok(TeacherListResponse {
            items: teachers.into_iter().map(|m| m.into_teacher()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新教师资料
    pub async fn update_teacher_impl(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        if self.get_teacher_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(phone) = update.phone {
            model.phone = Set(phone);
        }
        if let Some(profile_image) = update.profile_image {
            model.profile_image = Set(Some(profile_image));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("更新教师失败: {e}")))?;

        self.get_teacher_by_id_impl(id).await
    }

    /// 更新教师密码
    pub async fn update_teacher_password_impl(&self, id: i64, password_hash: &str) -> Result<bool> {
        let result = Teachers::update_many()
            .col_expr(
                Column::PasswordHash,
                sea_orm::sea_query::Expr::value(password_hash.to_string()),
            )
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("更新教师密码失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 删除教师（先删文件，再删工作单位）
    pub async fn delete_teacher_impl(&self, id: i64) -> Result<bool> {
        Files::delete_many()
            .filter(FileColumn::TeacherId.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("删除教师文件失败: {e}")))?;

        Jobs::delete_many()
            .filter(JobColumn::TeacherId.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                PortfolioError::database_operation(format!("删除教师工作单位失败: {e}"))
            })?;

        let result = Teachers::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("删除教师失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::models::teachers::requests::{
        CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest,
    };

    fn new_teacher(phone: &str, first_name: &str) -> CreateTeacherRequest {
        CreateTeacherRequest {
            first_name: first_name.to_string(),
            last_name: "Tursunov".to_string(),
            phone: phone.to_string(),
            password: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_phone() {
        let storage = memory_storage().await;
        let created = storage
            .create_teacher_impl(new_teacher("+998901112233", "Bekzod"))
            .await
            .unwrap();

        let found = storage
            .get_teacher_by_phone_impl("+998901112233")
            .await
            .unwrap()
            .expect("teacher should exist");
        assert_eq!(found.id, created.id);
        assert_eq!(found.password_hash, "hash");
        assert!(
            storage
                .get_teacher_by_phone_impl("+998900000000")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_phone_rejected_by_schema() {
        let storage = memory_storage().await;
        storage
            .create_teacher_impl(new_teacher("+998901112233", "Bekzod"))
            .await
            .unwrap();
        assert!(
            storage
                .create_teacher_impl(new_teacher("+998901112233", "Dilshod"))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_update_and_search() {
        let storage = memory_storage().await;
        let a = storage
            .create_teacher_impl(new_teacher("+998901112233", "Bekzod"))
            .await
            .unwrap();
        storage
            .create_teacher_impl(new_teacher("+998901112244", "Dilshod"))
            .await
            .unwrap();

        let updated = storage
            .update_teacher_impl(
                a.id,
                UpdateTeacherRequest {
                    first_name: Some("Bobur".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.first_name, "Bobur");
        assert_eq!(updated.phone, "+998901112233");

        let page = storage
            .list_teachers_with_pagination_impl(TeacherListQuery {
                search: Some("Bob".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.items[0].id, a.id);

        assert!(
            storage
                .update_teacher_impl(9999, UpdateTeacherRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
