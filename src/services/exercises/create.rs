use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExerciseService;
use crate::cache::QueryKey;
use crate::config::AppConfig;
use crate::models::exercises::{entities::Exercise, requests::CreateExerciseRequest};
use crate::models::realtime::entities::{ChangeEvent, ChangeKind};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{RealtimeHub, get_query_cache};
use crate::utils::validate::non_blank;

/// 校验并规范化发布请求
fn validate_exercise(
    mut body: CreateExerciseRequest,
    matters: &[String],
) -> Result<CreateExerciseRequest, (ErrorCode, &'static str)> {
    body.title = body.title.trim().to_string();
    body.description = body.description.trim().to_string();
    body.image_url = non_blank(body.image_url.take());
    body.matter = non_blank(body.matter.take());

    if body.title.is_empty() || body.description.is_empty() {
        return Err((
            ErrorCode::ExerciseInvalid,
            "Title and description are required",
        ));
    }

    if let Some(matter) = &body.matter
        && !matters.iter().any(|m| m == matter)
    {
        return Err((ErrorCode::ExerciseMatterInvalid, "Unknown matter"));
    }

    Ok(body)
}

pub async fn create_exercise(
    service: &ExerciseService,
    request: &HttpRequest,
    professor_id: i64,
    body: CreateExerciseRequest,
) -> ActixResult<HttpResponse> {
    let body = match validate_exercise(body, &AppConfig::get().app.matters) {
        Ok(body) => body,
        Err((code, msg)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg)));
        }
    };

    let storage = service.get_storage(request);

    match storage.create_exercise(professor_id, body).await {
        Ok(exercise) => {
            tracing::info!(
                "Exercise {} created by professor {}",
                exercise.id,
                professor_id
            );

            // 乐观更新：把新练习放到缓存列表最前面
            let cache = get_query_cache(request);
            let created = exercise.clone();
            cache
                .set_query_data(&QueryKey::Exercises, |mut items: Vec<Exercise>| {
                    items.retain(|e| e.id != created.id);
                    items.insert(0, created);
                    items
                })
                .await;

            RealtimeHub::get().publish(ChangeEvent::exercise(ChangeKind::Insert, exercise.id));

            Ok(HttpResponse::Created().json(ApiResponse::success(
                exercise,
                "Exercise published successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ExerciseCreationFailed,
                format!("Failed to create exercise: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matters() -> Vec<String> {
        vec!["Matemáticas".to_string(), "Física".to_string()]
    }

    fn request(title: &str, description: &str, matter: Option<&str>) -> CreateExerciseRequest {
        CreateExerciseRequest {
            title: title.to_string(),
            description: description.to_string(),
            image_url: Some("  ".to_string()),
            matter: matter.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_exercise_trims_fields() {
        let body = validate_exercise(request("  Derivadas ", " Resuelve ", Some(" Física ")), &matters())
            .unwrap();
        assert_eq!(body.title, "Derivadas");
        assert_eq!(body.description, "Resuelve");
        assert_eq!(body.matter.as_deref(), Some("Física"));
        assert!(body.image_url.is_none());
    }

    #[test]
    fn test_validate_exercise_requires_title_and_description() {
        let err = validate_exercise(request("  ", "Algo", None), &matters()).unwrap_err();
        assert_eq!(err.0, ErrorCode::ExerciseInvalid);
        let err = validate_exercise(request("Algo", "", None), &matters()).unwrap_err();
        assert_eq!(err.0, ErrorCode::ExerciseInvalid);
    }

    #[test]
    fn test_validate_exercise_rejects_unknown_matter() {
        let err = validate_exercise(request("Algo", "Algo", Some("Alquimia")), &matters()).unwrap_err();
        assert_eq!(err.0, ErrorCode::ExerciseMatterInvalid);
        assert!(validate_exercise(request("Algo", "Algo", Some("")), &matters()).is_ok());
    }
}
