//! 路径参数提取器
//!
//! 解析失败时直接返回统一格式的 400 响应，处理函数拿到的都是合法值。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::files::entities::Bucket;
use crate::models::{ApiResponse, ErrorCode};

static OBJECT_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+-[0-9]+\.[a-z0-9]{1,8}$").expect("Invalid object name regex")
});

fn bad_request(code: ErrorCode, message: &'static str) -> actix_web::Error {
    InternalError::from_response(
        message,
        HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message)),
    )
    .into()
}

/// 正整数 ID，来自路径中的 `{id}`
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let parsed = req
            .match_info()
            .get("id")
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|id| *id > 0);

        ready(match parsed {
            Some(id) => Ok(SafeIDI64(id)),
            None => Err(bad_request(ErrorCode::BadRequest, "Invalid id parameter")),
        })
    }
}

/// 存储桶名，来自路径中的 `{bucket}`
#[derive(Debug, Clone, Copy)]
pub struct SafeBucket(pub Bucket);

impl FromRequest for SafeBucket {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let parsed = req
            .match_info()
            .get("bucket")
            .and_then(|raw| raw.parse::<Bucket>().ok());

        ready(match parsed {
            Some(bucket) => Ok(SafeBucket(bucket)),
            None => Err(bad_request(ErrorCode::BucketInvalid, "Unknown storage bucket")),
        })
    }
}

/// 桶内对象名，只允许 `{profile_id}-{unix_millis}.{ext}` 形式
#[derive(Debug, Clone)]
pub struct SafeObjectName(pub String);

impl SafeObjectName {
    pub fn is_valid(name: &str) -> bool {
        OBJECT_NAME_RE.is_match(name)
    }
}

impl FromRequest for SafeObjectName {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let name = req.match_info().get("name").unwrap_or_default();

        ready(if Self::is_valid(name) {
            Ok(SafeObjectName(name.to_string()))
        } else {
            Err(bad_request(ErrorCode::FileNotFound, "Invalid object name"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_safe_id_rejects_non_positive() {
        let req = TestRequest::default()
            .param("id", "12")
            .to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 12);

        let req = TestRequest::default().param("id", "0").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());

        let req = TestRequest::default().param("id", "abc").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn test_safe_bucket() {
        let req = TestRequest::default()
            .param("bucket", "exercises")
            .to_http_request();
        assert_eq!(SafeBucket::extract(&req).await.unwrap().0, Bucket::Exercises);

        let req = TestRequest::default()
            .param("bucket", "avatars")
            .to_http_request();
        assert!(SafeBucket::extract(&req).await.is_err());
    }

    #[test]
    fn test_object_name_pattern() {
        assert!(SafeObjectName::is_valid("3-1700000000000.png"));
        assert!(!SafeObjectName::is_valid("../etc/passwd"));
        assert!(!SafeObjectName::is_valid("3-1700000000000.png/x"));
    }
}
