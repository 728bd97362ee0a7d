/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>` 中的 access token，
 * 成功后把 `Profile` 放入请求扩展，失败返回 401。
 *
 * ```rust,ignore
 * web::scope("/api/v1/exercises")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_exercises))
 * ```
 *
 * 处理函数中通过 `RequireJWT::extract_profile(&req)` 取得当前用户。
 * 用户资料按 token 缓存在 `session:{token}` 下，注销时清除。
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::models::ErrorCode;
use crate::models::profiles::entities::Profile;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

pub fn session_cache_key(token: &str) -> String {
    format!("session:{token}")
}

/// 校验 access token 并加载对应的用户资料
///
/// WebSocket 握手等无法使用请求头的场景也复用此函数。
pub async fn authenticate_token(
    token: &str,
    cache: &Arc<dyn ObjectCache>,
    storage: &Arc<dyn Storage>,
) -> Result<Profile, String> {
    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let cache_key = session_cache_key(token);
    match cache.get_raw(&cache_key).await {
        CacheResult::Found(json) => match serde_json::from_str::<Profile>(&json) {
            Ok(profile) => return Ok(profile),
            Err(_) => {
                cache.remove(&cache_key).await;
                info!("Failed to deserialize profile from session cache");
            }
        },
        _ => debug!("Session not cached, loading profile from storage"),
    }

    let profile_id = claims
        .profile_id()
        .ok_or_else(|| "Invalid profile ID in JWT".to_string())?;

    let profile = storage
        .get_profile_by_id(profile_id)
        .await
        .map_err(|_| "Failed to retrieve profile from storage".to_string())?
        .ok_or_else(|| "Profile not found".to_string())?;

    if let Ok(json) = serde_json::to_string(&profile) {
        cache
            .insert_raw(cache_key, json, JwtUtils::access_token_ttl() as u64)
            .await;
    }

    Ok(profile)
}

// 辅助函数：从请求头提取 token 并完成认证
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<Profile, String> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone();

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone();

    authenticate_token(token, &cache, &storage).await
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(profile) => {
                    debug!("JWT authentication successful for ID: {}", profile.id);
                    req.extensions_mut().insert(profile);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中提取当前用户资料
    pub fn extract_profile(req: &actix_web::HttpRequest) -> Option<Profile> {
        req.extensions().get::<Profile>().cloned()
    }

    pub fn extract_profile_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<Profile>().map(|profile| profile.id)
    }

    /// 提取 Bearer token 原文
    pub fn extract_bearer_token(req: &actix_web::HttpRequest) -> Option<String> {
        req.headers()
            .get(AUTHORIZATION_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix(BEARER_PREFIX))
            .map(|s| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::models::profiles::entities::ProfileRole;
    use crate::models::profiles::requests::CreateProfileRequest;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use std::time::Duration;

    #[tokio::test]
    async fn test_authenticate_token_caches_session() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let cache: Arc<dyn ObjectCache> =
            Arc::new(MokaCacheWrapper::with_settings(100, Duration::from_secs(60)));

        let profile = storage
            .create_profile(CreateProfileRequest {
                email: "sesion@example.com".to_string(),
                password: "hash".to_string(),
                full_name: "Sesión".to_string(),
                role: Some(ProfileRole::Professor),
                youtube_channel: None,
            })
            .await
            .unwrap();
        let token = JwtUtils::generate_access_token(profile.id, profile.role).unwrap();

        let authenticated = authenticate_token(&token, &cache, &storage).await.unwrap();
        assert_eq!(authenticated.id, profile.id);
        assert!(matches!(
            cache.get_raw(&session_cache_key(&token)).await,
            CacheResult::Found(_)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_token_rejects_garbage() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let cache: Arc<dyn ObjectCache> =
            Arc::new(MokaCacheWrapper::with_settings(100, Duration::from_secs(60)));
        assert!(authenticate_token("not-a-jwt", &cache, &storage).await.is_err());
    }

    #[tokio::test]
    async fn test_authenticate_token_unknown_profile() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let cache: Arc<dyn ObjectCache> =
            Arc::new(MokaCacheWrapper::with_settings(100, Duration::from_secs(60)));
        let token = JwtUtils::generate_access_token(999, ProfileRole::Student).unwrap();
        assert_eq!(
            authenticate_token(&token, &cache, &storage).await.unwrap_err(),
            "Profile not found"
        );
    }
}
