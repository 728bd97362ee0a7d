//! 文件存储操作

use super::SeaOrmStorage;
use crate::entity::files::{ActiveModel, Column, Entity as Files};
use crate::errors::{BecanizadoError, Result};
use crate::models::files::entities::{Bucket, NewStoredFile, StoredFile};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建文件记录
    pub async fn create_file_impl(&self, file: NewStoredFile) -> Result<StoredFile> {
        let model = ActiveModel {
            bucket: Set(file.bucket.to_string()),
            object_name: Set(file.object_name),
            original_name: Set(file.original_name),
            file_size: Set(file.file_size),
            content_type: Set(file.content_type),
            owner_id: Set(file.owner_id),
            uploaded_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("上传文件记录失败: {e}")))?;

        Ok(result.into_stored_file())
    }

    /// 通过桶与对象名获取文件
    pub async fn get_file_impl(
        &self,
        bucket: Bucket,
        object_name: &str,
    ) -> Result<Option<StoredFile>> {
        let result = Files::find()
            .filter(Column::Bucket.eq(bucket.as_str()))
            .filter(Column::ObjectName.eq(object_name))
            .one(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("查询文件失败: {e}")))?;

        Ok(result.map(|m| m.into_stored_file()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::models::files::entities::{Bucket, NewStoredFile};
    use crate::models::profiles::requests::CreateProfileRequest;

    #[tokio::test]
    async fn test_file_lookup_is_scoped_to_bucket() {
        let storage = memory_storage().await;
        let owner = storage
            .create_profile_impl(CreateProfileRequest {
                email: "up@example.com".to_string(),
                password: "hash".to_string(),
                full_name: "Uploader".to_string(),
                role: None,
                youtube_channel: None,
            })
            .await
            .unwrap();

        let name = format!("{}-1700000000000.png", owner.id);
        storage
            .create_file_impl(NewStoredFile {
                bucket: Bucket::Submissions,
                object_name: name.clone(),
                original_name: "respuesta.png".to_string(),
                file_size: 128,
                content_type: "image/png".to_string(),
                owner_id: owner.id,
            })
            .await
            .unwrap();

        let found = storage
            .get_file_impl(Bucket::Submissions, &name)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.bucket, Bucket::Submissions);
        assert_eq!(found.file_size, 128);

        assert!(
            storage
                .get_file_impl(Bucket::Exercises, &name)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_object_name_is_unique_per_bucket() {
        let storage = memory_storage().await;
        let owner = storage
            .create_profile_impl(CreateProfileRequest {
                email: "dos@example.com".to_string(),
                password: "hash".to_string(),
                full_name: "Dos Cubos".to_string(),
                role: None,
                youtube_channel: None,
            })
            .await
            .unwrap();

        let name = format!("{}-1700000000000.png", owner.id);
        let record = |bucket| NewStoredFile {
            bucket,
            object_name: name.clone(),
            original_name: "foto.png".to_string(),
            file_size: 64,
            content_type: "image/png".to_string(),
            owner_id: owner.id,
        };

        storage.create_file_impl(record(Bucket::Exercises)).await.unwrap();
        storage.create_file_impl(record(Bucket::Submissions)).await.unwrap();
        assert!(
            storage
                .create_file_impl(record(Bucket::Submissions))
                .await
                .is_err()
        );
    }
}
