use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 教师管理方法
    // 创建教师（password 已哈希）
    async fn create_teacher(&self, teacher: CreateTeacherRequest) -> Result<Teacher>;
    // 通过ID获取教师
    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>>;
    // 通过手机号获取教师
    async fn get_teacher_by_phone(&self, phone: &str) -> Result<Option<Teacher>>;
    // 分页列出教师
    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse>;
    // 更新教师资料（不含密码）
    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>>;
    // 更新教师密码哈希
    async fn update_teacher_password(&self, id: i64, password_hash: &str) -> Result<bool>;
    // 删除教师及其工作单位、文件
    async fn delete_teacher(&self, id: i64) -> Result<bool>;

    /// 管理员/检查员管理方法
    async fn create_admin(&self, admin: CreateAdminRequest) -> Result<Admin>;
    async fn get_admin_by_id(&self, id: i64) -> Result<Option<Admin>>;
    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>>;
    async fn list_admins(&self) -> Result<Vec<Admin>>;
    async fn update_admin(&self, id: i64, update: UpdateAdminRequest) -> Result<Option<Admin>>;
    async fn delete_admin(&self, id: i64) -> Result<bool>;
    async fn update_admin_last_login(&self, id: i64) -> Result<bool>;
    async fn count_admins(&self) -> Result<u64>;

    /// 工作单位管理方法
    async fn create_job(&self, teacher_id: i64, job: CreateJobRequest) -> Result<Job>;
    async fn get_job_by_id(&self, id: i64) -> Result<Option<Job>>;
    async fn list_jobs_by_teacher(&self, teacher_id: i64) -> Result<Vec<Job>>;
    async fn update_job(&self, id: i64, update: UpdateJobRequest) -> Result<Option<Job>>;
    // 删除工作单位及其下文件
    async fn delete_job(&self, id: i64) -> Result<bool>;

    /// 成就类别管理方法
    async fn create_achievement(&self, achievement: CreateAchievementRequest)
    -> Result<Achievement>;
    async fn get_achievement_by_id(&self, id: i64) -> Result<Option<Achievement>>;
    async fn list_achievements(&self) -> Result<Vec<Achievement>>;
    // 删除成就类别及引用它的文件
    async fn delete_achievement(&self, id: i64) -> Result<bool>;
    // 删除全部成就类别，返回被删除的记录
    async fn delete_all_achievements(&self) -> Result<Vec<Achievement>>;

    /// 提交文件管理方法
    async fn create_file(&self, record: NewFileRecord) -> Result<SubmittedFile>;
    async fn get_file_by_id(&self, id: i64) -> Result<Option<SubmittedFile>>;
    async fn list_files_by_teacher(&self, teacher_id: i64) -> Result<Vec<SubmittedFile>>;
    async fn list_files_by_job(&self, job_id: i64) -> Result<Vec<SubmittedFile>>;
    async fn list_files_by_achievement(&self, achievement_id: i64) -> Result<Vec<SubmittedFile>>;
    // 待审核文件；region 为 Some 时只返回该地区
    async fn list_pending_files_with_pagination(
        &self,
        region: Option<&str>,
        query: PaginationQuery,
    ) -> Result<FileListResponse>;
    // 审核：仅当文件仍为 pending 时生效，否则返回 None
    async fn review_file(&self, id: i64, decision: ReviewDecision)
    -> Result<Option<SubmittedFile>>;
    async fn delete_file(&self, id: i64) -> Result<bool>;
    // 仅当文件仍为 pending 时删除，未命中返回 false
    async fn delete_pending_file(&self, id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
