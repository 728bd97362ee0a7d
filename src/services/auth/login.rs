use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let email = login_request.email.trim().to_lowercase();

    if email.is_empty() || login_request.password.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Email and password are required",
        )));
    }

    // 1. 根据邮箱获取用户资料
    match storage.get_profile_by_email(&email).await {
        Ok(Some(profile)) => {
            // 2. 验证密码
            if !verify_password(&login_request.password, &profile.password_hash) {
                return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                    ErrorCode::AuthFailed,
                    "Email or password is incorrect",
                )));
            }

            // 3. 生成令牌对
            let refresh_expiry = JwtUtils::refresh_token_expiry(login_request.remember_me);
            match profile.generate_token_pair(Some(refresh_expiry)) {
                Ok(token_pair) => {
                    tracing::info!("Profile {} logged in successfully", profile.email);

                    let capabilities = profile.capabilities();
                    let response = LoginResponse {
                        access_token: token_pair.access_token,
                        expires_in: JwtUtils::access_token_ttl(),
                        profile,
                        capabilities,
                        created_at: chrono::Utc::now(),
                    };

                    // 4. refresh token 写入 HttpOnly cookie
                    let refresh_cookie = JwtUtils::create_refresh_token_cookie(
                        &token_pair.refresh_token,
                        refresh_expiry,
                    );

                    Ok(HttpResponse::Ok()
                        .cookie(refresh_cookie)
                        .json(ApiResponse::success(response, "Login successful")))
                }
                Err(e) => {
                    tracing::error!("Failed to generate JWT token: {}", e);
                    Ok(
                        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            "Login failed, unable to generate token",
                        )),
                    )
                }
            }
        }
        Ok(None) => Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Email or password is incorrect",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Login failed: {e}"),
            )),
        ),
    }
}
