use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExerciseService;
use crate::cache::QueryKey;
use crate::models::exercises::entities::Exercise;
use crate::models::realtime::entities::{ChangeEvent, ChangeKind};
use crate::models::submissions::entities::Submission;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{RealtimeHub, get_query_cache};

pub async fn delete_exercise(
    service: &ExerciseService,
    request: &HttpRequest,
    exercise_id: i64,
    professor_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 只删除属于当前教师的练习，答案由外键级联删除
    match storage.delete_exercise(exercise_id, professor_id).await {
        Ok(true) => {
            tracing::info!(
                "Exercise {} deleted by professor {}",
                exercise_id,
                professor_id
            );

            let cache = get_query_cache(request);
            cache
                .set_query_data(&QueryKey::Exercises, |mut items: Vec<Exercise>| {
                    items.retain(|e| e.id != exercise_id);
                    items
                })
                .await;
            cache
                .set_query_data(&QueryKey::Submissions, |mut items: Vec<Submission>| {
                    items.retain(|s| s.exercise_id != exercise_id);
                    items
                })
                .await;
            cache
                .remove(&QueryKey::ExerciseSubmissions(exercise_id))
                .await;

            RealtimeHub::get().publish(ChangeEvent::exercise(ChangeKind::Delete, exercise_id));

            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Exercise deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ExerciseNotFound,
            "Exercise not found or no permission",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ExerciseDeleteFailed,
                format!("Failed to delete exercise: {e}"),
            )),
        ),
    }
}
