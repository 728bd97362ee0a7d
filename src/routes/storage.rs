use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::services::FileService;
use crate::utils::{SafeBucket, SafeObjectName};

// 懒加载的全局 FileService 实例
static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn handle_upload(
    request: HttpRequest,
    bucket: SafeBucket,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE
        .handle_upload(&request, bucket.0, payload)
        .await
}

pub async fn handle_download(
    request: HttpRequest,
    bucket: SafeBucket,
    name: SafeObjectName,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE
        .handle_download(&request, bucket.0, name.0)
        .await
}

// 配置路由：上传需要登录，读取公开
pub fn configure_storage_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/storage")
            .service(
                web::resource("/{bucket}")
                    .wrap(RateLimit::file_upload())
                    .wrap(middlewares::RequireJWT)
                    .route(web::post().to(handle_upload)),
            )
            .route("/{bucket}/{name}", web::get().to(handle_download)),
    );
}
