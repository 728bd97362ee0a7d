pub mod create;
pub mod delete;
pub mod detail;
pub mod filter;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::exercises::requests::{CreateExerciseRequest, ExerciseListParams};
use crate::storage::Storage;

pub use filter::filter_exercises;
pub(crate) use list::cached_exercises;

pub struct ExerciseService {
    storage: Option<Arc<dyn Storage>>,
}

impl ExerciseService {
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

    // 列出练习
    pub async fn list_exercises(
        &self,
        request: &HttpRequest,
        query: ExerciseListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_exercises(self, request, query).await
    }

    // 获取练习详情
    pub async fn get_exercise(
        &self,
        request: &HttpRequest,
        exercise_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_exercise(self, request, exercise_id).await
    }

    // 发布练习
    pub async fn create_exercise(
        &self,
        request: &HttpRequest,
        professor_id: i64,
        body: CreateExerciseRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_exercise(self, request, professor_id, body).await
    }

    // 删除练习
    pub async fn delete_exercise(
        &self,
        request: &HttpRequest,
        exercise_id: i64,
        professor_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_exercise(self, request, exercise_id, professor_id).await
    }
}
