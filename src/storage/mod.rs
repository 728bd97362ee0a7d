use std::sync::Arc;

use crate::models::{
    exercises::{entities::Exercise, requests::CreateExerciseRequest},
    files::entities::{Bucket, NewStoredFile, StoredFile},
    profiles::{entities::Profile, requests::CreateProfileRequest},
    submissions::{entities::Submission, requests::CreateSubmissionRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户资料方法
    // 创建用户资料（password 字段需为哈希后的值）
    async fn create_profile(&self, profile: CreateProfileRequest) -> Result<Profile>;
    // 通过ID获取用户资料
    async fn get_profile_by_id(&self, id: i64) -> Result<Option<Profile>>;
    // 通过邮箱获取用户资料
    async fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>>;
    // 用户总数
    async fn count_profiles(&self) -> Result<u64>;

    /// 练习方法
    // 发布练习
    async fn create_exercise(
        &self,
        professor_id: i64,
        exercise: CreateExerciseRequest,
    ) -> Result<Exercise>;
    // 通过ID获取练习（含发布者资料）
    async fn get_exercise_by_id(&self, id: i64) -> Result<Option<Exercise>>;
    // 列出全部练习，按发布时间倒序
    async fn list_exercises(&self) -> Result<Vec<Exercise>>;
    // 删除练习，仅当发布者匹配时生效
    async fn delete_exercise(&self, id: i64, professor_id: i64) -> Result<bool>;

    /// 答案方法
    // 提交答案
    async fn create_submission(
        &self,
        exercise_id: i64,
        student_id: i64,
        submission: CreateSubmissionRequest,
    ) -> Result<Submission>;
    // 通过ID获取答案
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 列出全部答案（含学生与练习信息）
    async fn list_submissions(&self) -> Result<Vec<Submission>>;
    // 列出某个练习下的答案（含学生信息）
    async fn list_submissions_by_exercise(&self, exercise_id: i64) -> Result<Vec<Submission>>;
    // 写入反馈
    async fn update_submission_feedback(
        &self,
        id: i64,
        feedback: &str,
    ) -> Result<Option<Submission>>;
    // 删除答案
    async fn delete_submission(&self, id: i64) -> Result<bool>;

    /// 文件方法
    // 记录上传的文件
    async fn create_file(&self, file: NewStoredFile) -> Result<StoredFile>;
    // 通过桶与对象名获取文件
    async fn get_file(&self, bucket: Bucket, object_name: &str) -> Result<Option<StoredFile>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
