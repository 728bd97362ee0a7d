//! 练习实体

use sea_orm::entity::prelude::*;

use crate::models::profiles::entities::ProfileSummary;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exercises")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub professor_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub image_url: Option<String>,
    pub matter: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::ProfessorId",
        to = "super::profiles::Column::Id"
    )]
    Professor,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Professor.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_exercise(
        self,
        professor: Option<ProfileSummary>,
    ) -> crate::models::exercises::entities::Exercise {
        use crate::models::exercises::entities::Exercise;
        use chrono::{DateTime, Utc};

        Exercise {
            id: self.id,
            professor_id: self.professor_id,
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            matter: self.matter,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            professor,
        }
    }
}
