pub mod create;
pub mod delete;
pub mod feedback;
pub mod filter;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::requests::{
    CreateSubmissionRequest, FeedbackRequest, SubmissionListParams,
};
use crate::storage::Storage;

pub use filter::filter_submissions;
pub(crate) use list::cached_submissions;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 教师查看全部答案
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        query: SubmissionListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, query).await
    }

    // 某个练习下的答案
    pub async fn list_exercise_submissions(
        &self,
        request: &HttpRequest,
        exercise_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_exercise_submissions(self, request, exercise_id).await
    }

    // 学生提交答案
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        exercise_id: i64,
        student_id: i64,
        body: CreateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, request, exercise_id, student_id, body).await
    }

    // 教师反馈
    pub async fn give_feedback(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        body: FeedbackRequest,
    ) -> ActixResult<HttpResponse> {
        feedback::give_feedback(self, request, submission_id, body).await
    }

    // 删除答案
    pub async fn delete_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        professor_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_submission(self, request, submission_id, professor_id).await
    }
}
