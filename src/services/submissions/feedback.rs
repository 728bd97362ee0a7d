use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::cache::QueryKey;
use crate::models::realtime::entities::{ChangeEvent, ChangeKind};
use crate::models::submissions::{entities::Submission, requests::FeedbackRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{RealtimeHub, get_query_cache};

pub async fn give_feedback(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    body: FeedbackRequest,
) -> ActixResult<HttpResponse> {
    let feedback = body.feedback.trim().to_string();
    if feedback.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FeedbackEmpty,
            "Feedback must not be empty",
        )));
    }

    let storage = service.get_storage(request);

    match storage
        .update_submission_feedback(submission_id, &feedback)
        .await
    {
        Ok(Some(submission)) => {
            let exercise_id = submission.exercise_id;
            let cache = get_query_cache(request);
            for key in [
                QueryKey::Submissions,
                QueryKey::ExerciseSubmissions(exercise_id),
            ] {
                cache
                    .set_query_data(&key, |items: Vec<Submission>| {
                        items
                            .into_iter()
                            .map(|s| {
                                if s.id == submission_id {
                                    s.with_feedback(feedback.clone())
                                } else {
                                    s
                                }
                            })
                            .collect::<Vec<_>>()
                    })
                    .await;
            }

            RealtimeHub::get().publish(ChangeEvent::submission(
                ChangeKind::Update,
                submission_id,
                exercise_id,
            ));

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                submission,
                "Feedback saved successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FeedbackFailed,
                format!("Failed to save feedback: {e}"),
            )),
        ),
    }
}
