//! 文件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub bucket: String,
    pub object_name: String,
    pub original_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub owner_id: i64,
    pub uploaded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::OwnerId",
        to = "super::profiles::Column::Id"
    )]
    Owner,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_stored_file(self) -> crate::models::files::entities::StoredFile {
        use crate::models::files::entities::{Bucket, StoredFile};
        use chrono::{DateTime, Utc};

        StoredFile {
            id: self.id,
            bucket: self.bucket.parse().unwrap_or(Bucket::Submissions),
            object_name: self.object_name,
            original_name: self.original_name,
            file_size: self.file_size,
            content_type: self.content_type,
            owner_id: self.owner_id,
            uploaded_at: DateTime::<Utc>::from_timestamp(self.uploaded_at, 0).unwrap_or_default(),
        }
    }
}
