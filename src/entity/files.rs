//! 提交文件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub stored_name: String,
    pub original_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub teacher_id: i64,
    pub teacher_first_name: String,
    pub teacher_last_name: String,
    pub job_id: i64,
    pub job_title: String,
    pub job_workplace: String,
    pub region: Option<String>,
    pub achievement_id: i64,
    pub achievement_title: String,
    pub achievement_section: String,
    pub rating_title: String,
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub result_message: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub inspector_score: Option<f64>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::TeacherId",
        to = "super::teachers::Column::Id"
    )]
    Teacher,
    #[sea_orm(
        belongs_to = "super::jobs::Entity",
        from = "Column::JobId",
        to = "super::jobs::Column::Id"
    )]
    Job,
    #[sea_orm(
        belongs_to = "super::achievements::Entity",
        from = "Column::AchievementId",
        to = "super::achievements::Column::Id"
    )]
    Achievement,
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::achievements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Achievement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_file(self) -> crate::models::files::entities::SubmittedFile {
        use crate::models::files::entities::{FileStatus, SubmittedFile};
        use chrono::{DateTime, Utc};

        SubmittedFile {
            file_url: SubmittedFile::download_url(self.id),
            id: self.id,
            title: self.title,
            stored_name: self.stored_name,
            original_name: self.original_name,
            file_size: self.file_size,
            file_type: self.file_type,
            teacher_id: self.teacher_id,
            teacher_first_name: self.teacher_first_name,
            teacher_last_name: self.teacher_last_name,
            job_id: self.job_id,
            job_title: self.job_title,
            job_workplace: self.job_workplace,
            region: self.region,
            achievement_id: self.achievement_id,
            achievement_title: self.achievement_title,
            achievement_section: self.achievement_section,
            rating_title: self.rating_title,
            rating: self.rating,
            status: self
                .status
                .parse::<FileStatus>()
                .unwrap_or(FileStatus::Pending),
            result_message: self.result_message,
            inspector_score: self.inspector_score,
            reviewed_by: self.reviewed_by,
            reviewed_at: self
                .reviewed_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
