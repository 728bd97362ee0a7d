use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::middlewares::require_jwt::authenticate_token;
use crate::models::realtime::requests::RealtimeParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::{RealtimeService, parse_tables};
use crate::storage::Storage;

/// 校验 token 后升级为 WebSocket 连接
pub async fn connect(
    req: HttpRequest,
    query: web::Query<RealtimeParams>,
    body: web::Payload,
) -> ActixResult<HttpResponse> {
    let query = query.into_inner();

    let tables = match parse_tables(query.tables.as_deref()) {
        Ok(tables) => tables,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    };

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone();
    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone();

    let profile = match authenticate_token(&query.token, &cache, &storage).await {
        Ok(profile) => profile,
        Err(err) => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                format!("Unauthorized: {err}"),
            )));
        }
    };

    let (response, session, stream) = actix_ws::handle(&req, body)?;
    actix_web::rt::spawn(RealtimeService::handle_connection(
        profile.id, tables, session, stream,
    ));

    Ok(response)
}

// 配置路由
pub fn configure_realtime_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/realtime", web::get().to(connect));
}
