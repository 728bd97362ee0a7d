use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::feed::requests::FeedParams;
use crate::services::FeedService;

// 懒加载的全局 FeedService 实例
static FEED_SERVICE: Lazy<FeedService> = Lazy::new(FeedService::new_lazy);

pub async fn get_feed(
    req: HttpRequest,
    query: web::Query<FeedParams>,
) -> ActixResult<HttpResponse> {
    FEED_SERVICE.get_feed(&req, query.into_inner()).await
}

pub async fn list_matters() -> ActixResult<HttpResponse> {
    FEED_SERVICE.list_matters().await
}

// 配置路由
pub fn configure_feed_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/matters", web::get().to(list_matters))
        .service(
            web::scope("/api/v1/feed")
                .wrap(middlewares::RequireJWT)
                .route("", web::get().to(get_feed)),
        );
}
