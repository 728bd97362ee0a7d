use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::profiles::entities::ProfileRole;
use crate::models::submissions::requests::{FeedbackRequest, SubmissionListParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::SubmissionService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 教师查看全部答案
pub async fn list_submissions(
    req: HttpRequest,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, query.into_inner())
        .await
}

// 写入反馈
pub async fn give_feedback(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<FeedbackRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .give_feedback(&req, path.0, body.into_inner())
        .await
}

// 删除答案
pub async fn delete_submission(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    let Some(professor_id) = RequireJWT::extract_profile_id(&req) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unable to get profile information",
        )));
    };

    SUBMISSION_SERVICE
        .delete_submission(&req, path.0, professor_id)
        .await
}

// 配置路由，整个作用域仅教师可访问
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireRole::new_any(ProfileRole::professor_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_submissions))
            .route("/{id}/feedback", web::put().to(give_feedback))
            .route("/{id}", web::delete().to(delete_submission)),
    );
}
