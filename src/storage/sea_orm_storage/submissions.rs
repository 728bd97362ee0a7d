//! 答案存储操作

use super::SeaOrmStorage;
use crate::entity::exercises::{Column as ExerciseColumn, Entity as Exercises};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions, Model};
use crate::errors::{BecanizadoError, Result};
use crate::models::exercises::entities::ExerciseRef;
use crate::models::submissions::{entities::Submission, requests::CreateSubmissionRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use std::collections::{HashMap, HashSet};

impl SeaOrmStorage {
    /// 提交答案
    pub async fn create_submission_impl(
        &self,
        exercise_id: i64,
        student_id: i64,
        req: CreateSubmissionRequest,
    ) -> Result<Submission> {
        let model = ActiveModel {
            exercise_id: Set(exercise_id),
            student_id: Set(student_id),
            image_url: Set(req.image_url),
            text_response: Set(req.text_response),
            feedback: Set(None),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("提交答案失败: {e}")))?;

        let mut items = self.attach_students(vec![result]).await?;
        items
            .pop()
            .ok_or_else(|| BecanizadoError::database_operation("提交答案后无法读取记录"))
    }

    /// 通过 ID 获取答案
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("查询答案失败: {e}")))?;

        Ok(result.map(|m| m.into_submission(None, None)))
    }

    /// 列出全部答案，附带学生与练习信息
    pub async fn list_submissions_impl(&self) -> Result<Vec<Submission>> {
        let submissions = Submissions::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("查询答案列表失败: {e}")))?;

        // 批量查询练习标题
        let exercise_ids: Vec<i64> = submissions
            .iter()
            .map(|s| s.exercise_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let exercise_map: HashMap<i64, ExerciseRef> = if exercise_ids.is_empty() {
            HashMap::new()
        } else {
            Exercises::find()
                .filter(ExerciseColumn::Id.is_in(exercise_ids))
                .all(&self.db)
                .await
                .map_err(|e| {
                    BecanizadoError::database_operation(format!("查询练习信息失败: {e}"))
                })?
                .into_iter()
                .map(|e| {
                    (
                        e.id,
                        ExerciseRef {
                            id: e.id,
                            title: e.title,
                        },
                    )
                })
                .collect()
        };

        let mut items = self.attach_students(submissions).await?;
        for item in items.iter_mut() {
            item.exercise = exercise_map.get(&item.exercise_id).cloned();
        }
        Ok(items)
    }

    /// 列出某个练习下的答案
    pub async fn list_submissions_by_exercise_impl(
        &self,
        exercise_id: i64,
    ) -> Result<Vec<Submission>> {
        let submissions = Submissions::find()
            .filter(Column::ExerciseId.eq(exercise_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("查询练习答案失败: {e}")))?;

        self.attach_students(submissions).await
    }

    /// 写入反馈（覆盖旧的反馈）
    pub async fn update_submission_feedback_impl(
        &self,
        id: i64,
        feedback: &str,
    ) -> Result<Option<Submission>> {
        let existing = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("查询答案失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.feedback = Set(Some(feedback.to_string()));

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("更新反馈失败: {e}")))?;

        Ok(self.attach_students(vec![updated]).await?.pop())
    }

    /// 删除答案
    pub async fn delete_submission_impl(&self, id: i64) -> Result<bool> {
        let result = Submissions::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("删除答案失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn attach_students(&self, submissions: Vec<Model>) -> Result<Vec<Submission>> {
        let students = self
            .profile_summaries(submissions.iter().map(|s| s.student_id))
            .await?;

        Ok(submissions
            .into_iter()
            .map(|s| {
                let student = students.get(&s.student_id).cloned();
                s.into_submission(student, None)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::models::exercises::requests::CreateExerciseRequest;
    use crate::models::profiles::{entities::ProfileRole, requests::CreateProfileRequest};
    use crate::models::submissions::entities::SubmissionStatus;
    use crate::models::submissions::requests::CreateSubmissionRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn profile(storage: &SeaOrmStorage, email: &str, role: ProfileRole) -> i64 {
        storage
            .create_profile_impl(CreateProfileRequest {
                email: email.to_string(),
                password: "hash".to_string(),
                full_name: email.split('@').next().unwrap_or_default().to_string(),
                role: Some(role),
                youtube_channel: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn seed(storage: &SeaOrmStorage) -> (i64, i64, i64) {
        let prof = profile(storage, "luz@example.com", ProfileRole::Professor).await;
        let student = profile(storage, "mario@example.com", ProfileRole::Student).await;
        let exercise = storage
            .create_exercise_impl(
                prof,
                CreateExerciseRequest {
                    title: "Derivadas".to_string(),
                    description: "Calcula f'(x)".to_string(),
                    image_url: None,
                    matter: None,
                },
            )
            .await
            .unwrap();
        (prof, student, exercise.id)
    }

    #[tokio::test]
    async fn test_create_and_list_submissions() {
        let storage = memory_storage().await;
        let (_, student, exercise_id) = seed(&storage).await;

        let created = storage
            .create_submission_impl(
                exercise_id,
                student,
                CreateSubmissionRequest {
                    text_response: Some("2x".to_string()),
                    image_url: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(created.status, SubmissionStatus::Pending);
        assert_eq!(
            created.student.as_ref().map(|s| s.full_name.as_str()),
            Some("mario")
        );

        let by_exercise = storage
            .list_submissions_by_exercise_impl(exercise_id)
            .await
            .unwrap();
        assert_eq!(by_exercise.len(), 1);
        assert!(by_exercise[0].exercise.is_none());

        let all = storage.list_submissions_impl().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(
            all[0].exercise.as_ref().map(|e| e.title.as_str()),
            Some("Derivadas")
        );
    }

    #[tokio::test]
    async fn test_feedback_replaces_previous_value() {
        let storage = memory_storage().await;
        let (_, student, exercise_id) = seed(&storage).await;
        let created = storage
            .create_submission_impl(
                exercise_id,
                student,
                CreateSubmissionRequest {
                    text_response: None,
                    image_url: Some("http://localhost/a.png".to_string()),
                },
            )
            .await
            .unwrap();

        let first = storage
            .update_submission_feedback_impl(created.id, "Revisa el signo")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.status, SubmissionStatus::Reviewed);

        let second = storage
            .update_submission_feedback_impl(created.id, "Correcto")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.feedback.as_deref(), Some("Correcto"));

        assert!(
            storage
                .update_submission_feedback_impl(9999, "x")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_delete_submission() {
        let storage = memory_storage().await;
        let (_, student, exercise_id) = seed(&storage).await;
        let created = storage
            .create_submission_impl(
                exercise_id,
                student,
                CreateSubmissionRequest {
                    text_response: Some("x".to_string()),
                    image_url: None,
                },
            )
            .await
            .unwrap();

        assert!(storage.delete_submission_impl(created.id).await.unwrap());
        assert!(!storage.delete_submission_impl(created.id).await.unwrap());
        assert!(storage.get_submission_by_id_impl(created.id).await.unwrap().is_none());
    }
}
