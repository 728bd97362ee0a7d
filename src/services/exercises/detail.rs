use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExerciseService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_exercise(
    service: &ExerciseService,
    request: &HttpRequest,
    exercise_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_exercise_by_id(exercise_id).await {
        Ok(Some(exercise)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            exercise,
            "Exercise retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ExerciseNotFound,
            "Exercise not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get exercise: {e}"),
            )),
        ),
    }
}
