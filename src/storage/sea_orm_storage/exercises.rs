//! 练习存储操作

use super::SeaOrmStorage;
use crate::entity::exercises::{ActiveModel, Column, Entity as Exercises};
use crate::errors::{BecanizadoError, Result};
use crate::models::exercises::{entities::Exercise, requests::CreateExerciseRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 发布练习
    pub async fn create_exercise_impl(
        &self,
        professor_id: i64,
        req: CreateExerciseRequest,
    ) -> Result<Exercise> {
        let model = ActiveModel {
            professor_id: Set(professor_id),
            title: Set(req.title),
            description: Set(req.description),
            image_url: Set(req.image_url),
            matter: Set(req.matter),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("创建练习失败: {e}")))?;

        let professor = self
            .profile_summaries([professor_id])
            .await?
            .remove(&professor_id);
        Ok(result.into_exercise(professor))
    }

    /// 通过 ID 获取练习
    pub async fn get_exercise_by_id_impl(&self, id: i64) -> Result<Option<Exercise>> {
        let result = Exercises::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("查询练习失败: {e}")))?;

        let Some(model) = result else {
            return Ok(None);
        };

        let professor = self
            .profile_summaries([model.professor_id])
            .await?
            .remove(&model.professor_id);
        Ok(Some(model.into_exercise(professor)))
    }

    /// 列出全部练习，最新的在前
    pub async fn list_exercises_impl(&self) -> Result<Vec<Exercise>> {
        let exercises = Exercises::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("查询练习列表失败: {e}")))?;

        let professors = self
            .profile_summaries(exercises.iter().map(|e| e.professor_id))
            .await?;

        Ok(exercises
            .into_iter()
            .map(|e| {
                let professor = professors.get(&e.professor_id).cloned();
                e.into_exercise(professor)
            })
            .collect())
    }

    /// 删除练习（级联删除其答案），发布者不匹配时不删除
    pub async fn delete_exercise_impl(&self, id: i64, professor_id: i64) -> Result<bool> {
        let result = Exercises::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::ProfessorId.eq(professor_id))
            .exec(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("删除练习失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::models::exercises::requests::CreateExerciseRequest;
    use crate::models::profiles::{entities::ProfileRole, requests::CreateProfileRequest};
    use crate::models::submissions::requests::CreateSubmissionRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn professor(storage: &SeaOrmStorage, email: &str) -> i64 {
        storage
            .create_profile_impl(CreateProfileRequest {
                email: email.to_string(),
                password: "hash".to_string(),
                full_name: "Profesora Ruiz".to_string(),
                role: Some(ProfileRole::Professor),
                youtube_channel: Some("https://youtube.com/@ruiz".to_string()),
            })
            .await
            .unwrap()
            .id
    }

    fn exercise(title: &str) -> CreateExerciseRequest {
        CreateExerciseRequest {
            title: title.to_string(),
            description: "Resolver la ecuación".to_string(),
            image_url: None,
            matter: Some("Matemáticas".to_string()),
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first_with_professor() {
        let storage = memory_storage().await;
        let prof = professor(&storage, "ruiz@example.com").await;

        let first = storage.create_exercise_impl(prof, exercise("Uno")).await.unwrap();
        let second = storage.create_exercise_impl(prof, exercise("Dos")).await.unwrap();
        assert_eq!(
            first.professor.as_ref().map(|p| p.full_name.as_str()),
            Some("Profesora Ruiz")
        );

        let list = storage.list_exercises_impl().await.unwrap();
        assert_eq!(list.len(), 2);
        // 同一秒内创建时按 ID 倒序
        assert_eq!(list[0].id, second.id);
        assert_eq!(list[1].id, first.id);
        assert!(list.iter().all(|e| e.professor.is_some()));
    }

    #[tokio::test]
    async fn test_delete_requires_owner_and_cascades() {
        let storage = memory_storage().await;
        let owner = professor(&storage, "owner@example.com").await;
        let other = professor(&storage, "other@example.com").await;
        let student = storage
            .create_profile_impl(CreateProfileRequest {
                email: "alumno@example.com".to_string(),
                password: "hash".to_string(),
                full_name: "Alumno".to_string(),
                role: None,
                youtube_channel: None,
            })
            .await
            .unwrap()
            .id;

        let created = storage.create_exercise_impl(owner, exercise("Tres")).await.unwrap();
        storage
            .create_submission_impl(
                created.id,
                student,
                CreateSubmissionRequest {
                    text_response: Some("42".to_string()),
                    image_url: None,
                },
            )
            .await
            .unwrap();

        assert!(!storage.delete_exercise_impl(created.id, other).await.unwrap());
        assert!(storage.get_exercise_by_id_impl(created.id).await.unwrap().is_some());

        assert!(storage.delete_exercise_impl(created.id, owner).await.unwrap());
        assert!(storage.get_exercise_by_id_impl(created.id).await.unwrap().is_none());
        assert!(
            storage
                .list_submissions_by_exercise_impl(created.id)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
