use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::channel::entities::ChannelVideosParams;
use crate::services::ChannelService;

// 懒加载的全局 ChannelService 实例
static CHANNEL_SERVICE: Lazy<ChannelService> = Lazy::new(ChannelService::new_lazy);

pub async fn list_videos(
    req: HttpRequest,
    query: web::Query<ChannelVideosParams>,
) -> ActixResult<HttpResponse> {
    CHANNEL_SERVICE.list_videos(&req, query.into_inner()).await
}

// 配置路由
pub fn configure_channel_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1/channel").route("/videos", web::get().to(list_videos)));
}
