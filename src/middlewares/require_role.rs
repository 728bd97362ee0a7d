/*!
 * 基于角色的访问控制中间件
 *
 * 必须在 RequireJWT 之后使用：
 *
 * ```rust,ignore
 * web::resource("")
 *     .route(web::post().to(create_exercise))
 *     .wrap(RequireRole::new_any(ProfileRole::professor_roles()))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    profiles::entities::{Profile, ProfileRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed_roles: Vec<ProfileRole>,
}

impl RequireRole {
    /// 只允许指定角色
    pub fn new(role: &ProfileRole) -> Self {
        Self {
            allowed_roles: vec![*role],
        }
    }

    /// 允许列表中的任一角色
    pub fn new_any(roles: &[&ProfileRole]) -> Self {
        Self {
            allowed_roles: roles.iter().map(|r| **r).collect(),
        }
    }

    pub fn allows(&self, role: ProfileRole) -> bool {
        self.allowed_roles.contains(&role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            policy: self.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    policy: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let policy = self.policy.clone();

        Box::pin(async move {
            let current = req
                .extensions()
                .get::<Profile>()
                .map(|profile| (profile.id, profile.role));

            match current {
                Some((_, role)) if policy.allows(role) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some((profile_id, role)) => {
                    info!(
                        "Access denied for profile {} (role: {}). Allowed roles: {:?}",
                        profile_id, role, policy.allowed_roles
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Access denied.",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!("Role check failed: no profile in request, RequireJWT must run first");
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, web};

    fn profile(role: ProfileRole) -> Profile {
        Profile {
            id: 1,
            email: "p@example.com".to_string(),
            password_hash: String::new(),
            full_name: "P".to_string(),
            role,
            youtube_channel: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_policy() {
        let professors = RequireRole::new_any(ProfileRole::professor_roles());
        assert!(professors.allows(ProfileRole::Professor));
        assert!(!professors.allows(ProfileRole::Student));
        assert!(RequireRole::new(&ProfileRole::Student).allows(ProfileRole::Student));
    }

    #[actix_web::test]
    async fn test_student_is_forbidden_from_professor_route() {
        use actix_web::test;

        let app = test::init_service(
            App::new().service(
                web::resource("/only-professors")
                    .route(web::post().to(HttpResponse::Ok))
                    .wrap(RequireRole::new_any(ProfileRole::professor_roles())),
            ),
        )
        .await;

        let req = test::TestRequest::post().uri("/only-professors").to_request();
        req.extensions_mut().insert(profile(ProfileRole::Student));
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post().uri("/only-professors").to_request();
        req.extensions_mut().insert(profile(ProfileRole::Professor));
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post().uri("/only-professors").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
