use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use super::{FileService, object_path};
use crate::config::AppConfig;
use crate::errors::BecanizadoError;
use crate::models::files::entities::Bucket;
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    bucket: Bucket,
    object_name: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let file = match storage.get_file(bucket, &object_name).await {
        Ok(Some(f)) => f,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("File query failed: {e}"),
                )),
            );
        }
    };

    let file_path = object_path(&AppConfig::get().upload.dir, bucket, &file.object_name);

    let data = match std::fs::read(&file_path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            )));
        }
        Err(e) => {
            tracing::error!("{}", BecanizadoError::file_operation(format!("{e}")));
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "File read failed",
                )),
            );
        }
    };

    // 对象名包含时间戳，内容不会改变
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, file.content_type))
        .insert_header((header::CACHE_CONTROL, "public, max-age=31536000, immutable"))
        .body(data))
}
