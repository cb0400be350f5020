//! 成就类别实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "achievements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub section: String,
    pub title: String,
    /// JSON 数组：[{ "about": ..., "rating": ... }]
    #[sea_orm(column_type = "Text")]
    pub ratings: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::files::Entity")]
    Files,
}

impl Related<super::files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_achievement(self) -> crate::models::achievements::entities::Achievement {
        use crate::models::achievements::entities::{Achievement, RatingOption};
        use chrono::{DateTime, Utc};

        let ratings = serde_json::from_str::<Vec<RatingOption>>(&self.ratings).unwrap_or_else(|e| {
            tracing::warn!("Achievement {} has malformed ratings: {}", self.id, e);
            Vec::new()
        });

        Achievement {
            id: self.id,
            section: self.section,
            title: self.title,
            ratings,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
