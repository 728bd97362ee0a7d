use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::cache::QueryKey;
use crate::models::realtime::entities::{ChangeEvent, ChangeKind};
use crate::models::submissions::{entities::Submission, requests::CreateSubmissionRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{RealtimeHub, get_query_cache};
use crate::utils::validate::non_blank;

pub const EMPTY_SUBMISSION_MESSAGE: &str = "Debes enviar texto, imagen o ambos.";

/// 文字与图片至少需要一项，空白内容视为未填写
pub fn validate_submission(
    body: CreateSubmissionRequest,
) -> Result<CreateSubmissionRequest, &'static str> {
    let body = CreateSubmissionRequest {
        text_response: non_blank(body.text_response),
        image_url: non_blank(body.image_url),
    };

    if body.text_response.is_none() && body.image_url.is_none() {
        return Err(EMPTY_SUBMISSION_MESSAGE);
    }
    Ok(body)
}

pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    exercise_id: i64,
    student_id: i64,
    body: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let body = match validate_submission(body) {
        Ok(body) => body,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::SubmissionEmpty, msg)));
        }
    };

    let storage = service.get_storage(request);

    // 练习必须存在
    let exercise = match storage.get_exercise_by_id(exercise_id).await {
        Ok(Some(exercise)) => exercise,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ExerciseNotFound,
                "Exercise not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get exercise: {e}"),
                )),
            );
        }
    };

    match storage
        .create_submission(exercise_id, student_id, body)
        .await
    {
        Ok(mut submission) => {
            tracing::info!(
                "Submission {} sent by student {} for exercise {}",
                submission.id,
                student_id,
                exercise_id
            );
            submission.exercise = Some(exercise.reference());

            let cache = get_query_cache(request);
            let created = submission.clone();
            cache
                .set_query_data(
                    &QueryKey::ExerciseSubmissions(exercise_id),
                    |mut items: Vec<Submission>| {
                        items.insert(0, Submission { exercise: None, ..created });
                        items
                    },
                )
                .await;
            let created = submission.clone();
            cache
                .set_query_data(&QueryKey::Submissions, |mut items: Vec<Submission>| {
                    items.insert(0, created);
                    items
                })
                .await;

            RealtimeHub::get().publish(ChangeEvent::submission(
                ChangeKind::Insert,
                submission.id,
                exercise_id,
            ));

            Ok(HttpResponse::Created().json(ApiResponse::success(
                submission,
                "Submission sent successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::SubmissionCreationFailed,
                format!("Failed to create submission: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(text: Option<&str>, image: Option<&str>) -> CreateSubmissionRequest {
        CreateSubmissionRequest {
            text_response: text.map(str::to_string),
            image_url: image.map(str::to_string),
        }
    }

    #[test]
    fn test_submission_requires_text_or_image() {
        assert_eq!(
            validate_submission(body(None, None)).unwrap_err(),
            EMPTY_SUBMISSION_MESSAGE
        );
        assert_eq!(
            validate_submission(body(Some("   "), Some(""))).unwrap_err(),
            EMPTY_SUBMISSION_MESSAGE
        );
    }

    #[test]
    fn test_submission_accepts_either_part() {
        let text_only = validate_submission(body(Some(" x = 2 "), None)).unwrap();
        assert_eq!(text_only.text_response.as_deref(), Some("x = 2"));
        assert!(text_only.image_url.is_none());

        let image_only = validate_submission(body(None, Some("http://img/1.png"))).unwrap();
        assert!(image_only.text_response.is_none());

        let both = validate_submission(body(Some("ver foto"), Some("http://img/1.png"))).unwrap();
        assert!(both.text_response.is_some() && both.image_url.is_some());
    }
}
