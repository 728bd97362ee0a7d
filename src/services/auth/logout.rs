use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::{RequireJWT, require_jwt::session_cache_key};
use crate::models::ApiResponse;
use crate::services::get_object_cache;
use crate::utils::jwt::JwtUtils;

/// 处理注销
/// 清除缓存的会话，并通过空的 refresh_token cookie 清除客户端登录状态
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    if let Some(token) = RequireJWT::extract_bearer_token(request) {
        get_object_cache(request)
            .remove(&session_cache_key(&token))
            .await;
    }

    // max_age=0 会让浏览器删除该 cookie
    let empty_cookie = JwtUtils::create_empty_refresh_token_cookie();

    Ok(HttpResponse::Ok()
        .cookie(empty_cookie)
        .json(ApiResponse::<()>::success_empty("Logged out")))
}
