use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::exercises::requests::{CreateExerciseRequest, ExerciseListParams};
use crate::models::profiles::entities::ProfileRole;
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{ExerciseService, SubmissionService};
use crate::utils::SafeIDI64;

// 懒加载的全局服务实例
static EXERCISE_SERVICE: Lazy<ExerciseService> = Lazy::new(ExerciseService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

fn missing_profile() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unable to get profile information",
    ))
}

// 列出练习
pub async fn list_exercises(
    req: HttpRequest,
    query: web::Query<ExerciseListParams>,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE
        .list_exercises(&req, query.into_inner())
        .await
}

// 发布练习
pub async fn create_exercise(
    req: HttpRequest,
    body: web::Json<CreateExerciseRequest>,
) -> ActixResult<HttpResponse> {
    let Some(professor_id) = RequireJWT::extract_profile_id(&req) else {
        return Ok(missing_profile());
    };

    EXERCISE_SERVICE
        .create_exercise(&req, professor_id, body.into_inner())
        .await
}

// 获取练习详情
pub async fn get_exercise(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE.get_exercise(&req, path.0).await
}

// 删除练习
pub async fn delete_exercise(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    let Some(professor_id) = RequireJWT::extract_profile_id(&req) else {
        return Ok(missing_profile());
    };

    EXERCISE_SERVICE
        .delete_exercise(&req, path.0, professor_id)
        .await
}

// 练习下的答案
pub async fn list_exercise_submissions(
    req: HttpRequest,
    path: SafeIDI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_exercise_submissions(&req, path.0)
        .await
}

// 提交答案
pub async fn create_submission(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let Some(student_id) = RequireJWT::extract_profile_id(&req) else {
        return Ok(missing_profile());
    };

    SUBMISSION_SERVICE
        .create_submission(&req, path.0, student_id, body.into_inner())
        .await
}

// 配置路由
pub fn configure_exercises_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exercises")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列出练习 - 所有登录用户
                    .route(web::get().to(list_exercises))
                    // 发布练习 - 仅教师
                    .route(
                        web::post()
                            .to(create_exercise)
                            .wrap(middlewares::RequireRole::new(&ProfileRole::Professor)),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_exercise))
                    // 删除练习 - 仅教师，业务层再校验发布者
                    .route(
                        web::delete()
                            .to(delete_exercise)
                            .wrap(middlewares::RequireRole::new(&ProfileRole::Professor)),
                    ),
            )
            .service(
                web::resource("/{id}/submissions")
                    // 答案列表 - 所有登录用户
                    .route(web::get().to(list_exercise_submissions))
                    // 提交答案 - 仅学生
                    .route(
                        web::post()
                            .to(create_submission)
                            .wrap(middlewares::RequireRole::new_any(ProfileRole::student_roles())),
                    ),
            ),
    );
}
