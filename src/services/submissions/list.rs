use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{SubmissionService, filter_submissions};
use crate::cache::{QueryCache, QueryKey};
use crate::errors::Result;
use crate::models::submissions::{
    entities::Submission, requests::SubmissionListParams, responses::SubmissionListResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::get_query_cache;
use crate::storage::Storage;

/// 经查询缓存读取全部答案（教师视图）
pub(crate) async fn cached_submissions(
    storage: &Arc<dyn Storage>,
    cache: &QueryCache,
) -> Result<Vec<Submission>> {
    cache
        .fetch(&QueryKey::Submissions, || async move {
            storage.list_submissions().await
        })
        .await
}

fn list_response(items: Vec<Submission>) -> SubmissionListResponse {
    SubmissionListResponse {
        total: items.len(),
        items,
    }
}

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    query: SubmissionListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = get_query_cache(request);

    match cached_submissions(&storage, &cache).await {
        Ok(items) => {
            let items = filter_submissions(items, query.search.as_deref());
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                list_response(items),
                "Submissions retrieved successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list submissions: {e}"),
            )),
        ),
    }
}

pub async fn list_exercise_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    exercise_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = get_query_cache(request);

    let result = cache
        .fetch(&QueryKey::ExerciseSubmissions(exercise_id), || async move {
            storage.list_submissions_by_exercise(exercise_id).await
        })
        .await;

    match result {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            list_response(items),
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list submissions: {e}"),
            )),
        ),
    }
}
