use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::cache::QueryKey;
use crate::models::realtime::entities::{ChangeEvent, ChangeKind};
use crate::models::submissions::entities::Submission;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{RealtimeHub, get_query_cache};

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SubmissionNotFound,
        "Submission not found or no permission",
    ))
}

fn internal_error(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::SubmissionDeleteFailed,
        format!("Failed to delete submission: {e}"),
    ))
}

pub async fn delete_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    professor_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => return Ok(not_found()),
        Err(e) => return Ok(internal_error(e)),
    };

    // 只有练习的发布者可以删除其下的答案
    match storage.get_exercise_by_id(submission.exercise_id).await {
        Ok(Some(exercise)) if exercise.is_owned_by(professor_id) => {}
        Ok(_) => return Ok(not_found()),
        Err(e) => return Ok(internal_error(e)),
    }

    match storage.delete_submission(submission_id).await {
        Ok(true) => {
            let exercise_id = submission.exercise_id;
            let cache = get_query_cache(request);
            for key in [
                QueryKey::Submissions,
                QueryKey::ExerciseSubmissions(exercise_id),
            ] {
                cache
                    .set_query_data(&key, |mut items: Vec<Submission>| {
                        items.retain(|s| s.id != submission_id);
                        items
                    })
                    .await;
            }

            RealtimeHub::get().publish(ChangeEvent::submission(
                ChangeKind::Delete,
                submission_id,
                exercise_id,
            ));

            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Submission deleted successfully",
            )))
        }
        Ok(false) => Ok(not_found()),
        Err(e) => Ok(internal_error(e)),
    }
}
