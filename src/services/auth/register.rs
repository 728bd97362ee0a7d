use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::profiles::{
    entities::ProfileRole, requests::CreateProfileRequest, responses::ProfileResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    non_blank, validate_email, validate_full_name, validate_password, validate_youtube_channel,
};

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    mut create_request: CreateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    create_request.email = create_request.email.trim().to_lowercase();
    create_request.full_name = create_request.full_name.trim().to_string();
    create_request.youtube_channel = non_blank(create_request.youtube_channel.take());

    // 1. 必填项与格式校验
    if let Err(msg) = validate_email(&create_request.email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ProfileEmailInvalid, msg)));
    }

    if let Err(msg) = validate_full_name(&create_request.full_name) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ProfileNameInvalid, msg)));
    }

    if let Err(msg) = validate_password(&create_request.password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ProfilePasswordInvalid, msg)));
    }

    if let Some(channel) = &create_request.youtube_channel
        && let Err(msg) = validate_youtube_channel(channel)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ProfileChannelInvalid, msg)));
    }

    // 2. 教师账号只在配置允许时可自助注册
    let role = create_request.role.unwrap_or(ProfileRole::Student);
    if role.is_professor() && !config.auth.allow_professor_signup {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ProfileRoleNotAllowed,
            "Professor accounts cannot be self-registered",
        )));
    }
    create_request.role = Some(role);

    // 3. 检查邮箱是否已存在
    if let Err(response) = check_email_exists(&storage, &create_request.email).await {
        return Ok(response);
    }

    // 4. 哈希密码并创建用户资料
    match hash_password(&create_request.password) {
        Ok(password_hash) => {
            create_request.password = password_hash;

            match storage.create_profile(create_request).await {
                Ok(profile) => {
                    tracing::info!("Profile {} registered as {}", profile.email, profile.role);
                    Ok(HttpResponse::Created().json(ApiResponse::success(
                        ProfileResponse::from(profile),
                        "Registration successful",
                    )))
                }
                Err(e) => Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::RegisterFailed,
                        format!("Register failed: {e}"),
                    )),
                ),
            }
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Password hashing failed: {e}"),
            )),
        ),
    }
}

async fn check_email_exists(storage: &Arc<dyn Storage>, email: &str) -> Result<(), HttpResponse> {
    match storage.get_profile_by_email(email).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::ProfileEmailAlreadyExists,
            "Email already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}
