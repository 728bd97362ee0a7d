use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{ExerciseService, filter_exercises};
use crate::cache::{QueryCache, QueryKey};
use crate::errors::Result;
use crate::models::exercises::{
    entities::Exercise, requests::ExerciseListParams, responses::ExerciseListResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::get_query_cache;
use crate::storage::Storage;

/// 经查询缓存读取完整的练习列表
pub(crate) async fn cached_exercises(
    storage: &Arc<dyn Storage>,
    cache: &QueryCache,
) -> Result<Vec<Exercise>> {
    cache
        .fetch(&QueryKey::Exercises, || async move {
            storage.list_exercises().await
        })
        .await
}

pub async fn list_exercises(
    service: &ExerciseService,
    request: &HttpRequest,
    query: ExerciseListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = get_query_cache(request);

    match cached_exercises(&storage, &cache).await {
        Ok(items) => {
            let items = filter_exercises(items, query.search.as_deref(), query.matter.as_deref());
            let response = ExerciseListResponse {
                total: items.len(),
                items,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Exercises retrieved successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list exercises: {e}"),
            )),
        ),
    }
}
