//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod achievements;
mod admins;
mod files;
mod jobs;
mod teachers;

use crate::config::AppConfig;
use crate::errors::{PortfolioError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| PortfolioError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM storage initialized, database: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| PortfolioError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| PortfolioError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| PortfolioError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(PortfolioError::database_config(format!(
                "Cannot infer database type from URL: {url}. Supported: sqlite://, postgres://, mysql://, or a .db/.sqlite file path"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    PaginationQuery,
    achievements::{entities::Achievement, requests::CreateAchievementRequest},
    admins::{
        entities::Admin,
        requests::{CreateAdminRequest, UpdateAdminRequest},
    },
    files::{
        entities::SubmittedFile,
        requests::{NewFileRecord, ReviewDecision},
        responses::FileListResponse,
    },
    jobs::{
        entities::Job,
        requests::{CreateJobRequest, UpdateJobRequest},
    },
    teachers::{
        entities::Teacher,
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
        responses::TeacherListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 教师模块
    async fn create_teacher(&self, teacher: CreateTeacherRequest) -> Result<Teacher> {
        self.create_teacher_impl(teacher).await
    }

    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_id_impl(id).await
    }

    async fn get_teacher_by_phone(&self, phone: &str) -> Result<Option<Teacher>> {
        self.get_teacher_by_phone_impl(phone).await
    }

    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        self.list_teachers_with_pagination_impl(query).await
    }

    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        self.update_teacher_impl(id, update).await
    }

    async fn update_teacher_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        self.update_teacher_password_impl(id, password_hash).await
    }

    async fn delete_teacher(&self, id: i64) -> Result<bool> {
        self.delete_teacher_impl(id).await
    }

    // 管理员模块
    async fn create_admin(&self, admin: CreateAdminRequest) -> Result<Admin> {
        self.create_admin_impl(admin).await
    }

    async fn get_admin_by_id(&self, id: i64) -> Result<Option<Admin>> {
        self.get_admin_by_id_impl(id).await
    }

    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        self.get_admin_by_username_impl(username).await
    }

    async fn list_admins(&self) -> Result<Vec<Admin>> {
        self.list_admins_impl().await
    }

    async fn update_admin(&self, id: i64, update: UpdateAdminRequest) -> Result<Option<Admin>> {
        self.update_admin_impl(id, update).await
    }

    async fn delete_admin(&self, id: i64) -> Result<bool> {
        self.delete_admin_impl(id).await
    }

    async fn update_admin_last_login(&self, id: i64) -> Result<bool> {
        self.update_admin_last_login_impl(id).await
    }

    async fn count_admins(&self) -> Result<u64> {
        self.count_admins_impl().await
    }

    // 工作单位模块
    async fn create_job(&self, teacher_id: i64, job: CreateJobRequest) -> Result<Job> {
        self.create_job_impl(teacher_id, job).await
    }

    async fn get_job_by_id(&self, id: i64) -> Result<Option<Job>> {
        self.get_job_by_id_impl(id).await
    }

    async fn list_jobs_by_teacher(&self, teacher_id: i64) -> Result<Vec<Job>> {
        self.list_jobs_by_teacher_impl(teacher_id).await
    }

    async fn update_job(&self, id: i64, update: UpdateJobRequest) -> Result<Option<Job>> {
        self.update_job_impl(id, update).await
    }

    async fn delete_job(&self, id: i64) -> Result<bool> {
        self.delete_job_impl(id).await
    }

    // 成就类别模块
    async fn create_achievement(
        &self,
        achievement: CreateAchievementRequest,
    ) -> Result<Achievement> {
        self.create_achievement_impl(achievement).await
    }

    async fn get_achievement_by_id(&self, id: i64) -> Result<Option<Achievement>> {
        self.get_achievement_by_id_impl(id).await
    }

    async fn list_achievements(&self) -> Result<Vec<Achievement>> {
        self.list_achievements_impl().await
    }

    async fn delete_achievement(&self, id: i64) -> Result<bool> {
        self.delete_achievement_impl(id).await
    }

    async fn delete_all_achievements(&self) -> Result<Vec<Achievement>> {
        self.delete_all_achievements_impl().await
    }

    // 文件模块
    async fn create_file(&self, record: NewFileRecord) -> Result<SubmittedFile> {
        self.create_file_impl(record).await
    }

    async fn get_file_by_id(&self, id: i64) -> Result<Option<SubmittedFile>> {
        self.get_file_by_id_impl(id).await
    }

    async fn list_files_by_teacher(&self, teacher_id: i64) -> Result<Vec<SubmittedFile>> {
        self.list_files_by_teacher_impl(teacher_id).await
    }

    async fn list_files_by_job(&self, job_id: i64) -> Result<Vec<SubmittedFile>> {
        self.list_files_by_job_impl(job_id).await
    }

    async fn list_files_by_achievement(&self, achievement_id: i64) -> Result<Vec<SubmittedFile>> {
        self.list_files_by_achievement_impl(achievement_id).await
    }

    async fn list_pending_files_with_pagination(
        &self,
        region: Option<&str>,
        query: PaginationQuery,
    ) -> Result<FileListResponse> {
        self.list_pending_files_with_pagination_impl(region, query)
            .await
    }

    async fn review_file(
        &self,
        id: i64,
        decision: ReviewDecision,
    ) -> Result<Option<SubmittedFile>> {
        self.review_file_impl(id, decision).await
    }

    async fn delete_file(&self, id: i64) -> Result<bool> {
        self.delete_file_impl(id).await
    }

    async fn delete_pending_file(&self, id: i64) -> Result<bool> {
        self.delete_pending_file_impl(id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;

    /// 单连接内存库，保证迁移与查询落在同一个连接上
    pub async fn memory_storage() -> SeaOrmStorage {
        SeaOrmStorage::connect("sqlite::memory:", 1, 5)
            .await
            .expect("in-memory sqlite should open")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("portfolio.db").unwrap(),
            "sqlite://portfolio.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u:p@localhost/db").is_ok());
        assert!(SeaOrmStorage::build_database_url("mongodb://localhost").is_err());
    }
}
