use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{FileService, object_path, public_url_from_config};
use crate::config::AppConfig;
use crate::errors::BecanizadoError;
use crate::middlewares::RequireJWT;
use crate::models::files::{
    entities::{Bucket, NewStoredFile},
    responses::FileUploadResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::image_content_type;

/// 桶内对象名 `{profile_id}-{unix_millis}.{ext}`
pub fn object_name(profile_id: i64, unix_millis: i64, extension: &str) -> String {
    format!(
        "{}-{}.{}",
        profile_id,
        unix_millis,
        extension.trim_start_matches('.')
    )
}

// 同一毫秒内重名时最多顺延的次数
const MAX_NAME_ATTEMPTS: i64 = 64;

/// 以独占方式创建对象文件，重名时把时间戳顺延一毫秒，返回实际使用的对象名与路径
///
/// 只会删除本次调用自己创建的文件。
pub(crate) fn write_new_object(
    upload_dir: &str,
    bucket: Bucket,
    profile_id: i64,
    unix_millis: i64,
    extension: &str,
    data: &[u8],
) -> io::Result<(String, PathBuf)> {
    for offset in 0..MAX_NAME_ATTEMPTS {
        let name = object_name(profile_id, unix_millis + offset, extension);
        let path = object_path(upload_dir, bucket, &name);

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        };

        if let Err(e) = file.write_all(data).and_then(|_| file.sync_all()) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(e);
        }
        return Ok((name, path));
    }

    Err(io::Error::new(
        ErrorKind::AlreadyExists,
        "no free object name for this upload",
    ))
}

/// 从原始文件名中取出小写扩展名（带点号）
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

fn bad_request(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

fn upload_failed(message: impl Into<String>) -> HttpResponse {
    HttpResponse::InternalServerError()
        .json(ApiResponse::error_empty(ErrorCode::FileUploadFailed, message))
}

pub async fn handle_upload(
    service: &FileService,
    req: &HttpRequest,
    bucket: Bucket,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let max_size = config.upload.max_size;

    let profile_id = match RequireJWT::extract_profile_id(req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized access, please login",
            )));
        }
    };

    let mut original_name = String::new();
    let mut extension = String::new();
    let mut data: Vec<u8> = Vec::new();
    let mut file_uploaded = false;

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::info!("Malformed multipart payload: {}", e);
                return Ok(bad_request(
                    ErrorCode::BadRequest,
                    "Malformed multipart payload",
                ));
            }
        };

        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name != "file" {
            continue;
        }

        if file_uploaded {
            return Ok(bad_request(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time",
            ));
        }
        file_uploaded = true;

        original_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();

        extension = extension_of(&original_name);
        if !config
            .upload
            .allowed_types
            .iter()
            .any(|t| t.to_lowercase() == extension)
        {
            return Ok(bad_request(
                ErrorCode::FileTypeNotAllowed,
                "File type not allowed",
            ));
        }

        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            // 超出上限立即停止读取
            if data.len() + chunk.len() > max_size {
                return Ok(bad_request(
                    ErrorCode::FileSizeExceeded,
                    "File size exceeds the limit",
                ));
            }
            data.extend_from_slice(&chunk);
        }
    }

    if !file_uploaded || data.is_empty() {
        return Ok(bad_request(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        ));
    }

    let Some(content_type) = image_content_type(&data, &extension) else {
        return Ok(bad_request(
            ErrorCode::FileTypeNotAllowed,
            "File content does not match its extension",
        ));
    };

    let bucket_dir = Path::new(&config.upload.dir).join(bucket.as_str());
    if let Err(e) = fs::create_dir_all(&bucket_dir) {
        tracing::error!("{}", BecanizadoError::file_operation(format!("{e}")));
        return Ok(upload_failed("Failed to create upload directory"));
    }

    let (name, file_path) = match write_new_object(
        &config.upload.dir,
        bucket,
        profile_id,
        chrono::Utc::now().timestamp_millis(),
        &extension,
        &data,
    ) {
        Ok(written) => written,
        Err(e) => {
            tracing::error!("{}", BecanizadoError::file_operation(format!("{e}")));
            return Ok(upload_failed("Failed to write file"));
        }
    };

    let storage = service.get_storage(req);
    let record = NewStoredFile {
        bucket,
        object_name: name,
        original_name,
        file_size: data.len() as i64,
        content_type: content_type.to_string(),
        owner_id: profile_id,
    };

    match storage.create_file(record).await {
        Ok(file) => {
            tracing::info!(
                "Profile {} uploaded {}/{}",
                profile_id,
                file.bucket,
                file.object_name
            );
            let response = FileUploadResponse {
                public_url: public_url_from_config(file.bucket, &file.object_name),
                bucket: file.bucket,
                name: file.object_name,
                size: file.file_size,
                content_type: file.content_type,
            };
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(response, "File uploaded successfully")))
        }
        Err(e) => {
            // 文件由 write_new_object 独占创建，可以安全回收
            let _ = fs::remove_file(&file_path);
            Ok(upload_failed(format!("Failed to upload file: {e}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name_format() {
        assert_eq!(object_name(3, 1_700_000_000_123, ".png"), "3-1700000000123.png");
        assert_eq!(object_name(3, 5, "jpg"), "3-5.jpg");
    }

    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "becanizado-{}-{}-{}",
                tag,
                std::process::id(),
                chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
            ));
            fs::create_dir_all(dir.join(Bucket::Submissions.as_str())).unwrap();
            Self(dir)
        }

        fn path(&self) -> &str {
            self.0.to_str().unwrap()
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_same_millisecond_uploads_get_distinct_files() {
        let dir = ScratchDir::new("same-ms");

        let (first, first_path) =
            write_new_object(dir.path(), Bucket::Submissions, 3, 1_000, ".png", b"primero").unwrap();
        let (second, second_path) =
            write_new_object(dir.path(), Bucket::Submissions, 3, 1_000, ".png", b"segundo").unwrap();

        assert_eq!(first, "3-1000.png");
        assert_eq!(second, "3-1001.png");
        assert_eq!(fs::read(first_path).unwrap(), b"primero");
        assert_eq!(fs::read(second_path).unwrap(), b"segundo");
    }

    #[test]
    fn test_write_failure_leaves_existing_files_alone() {
        let dir = ScratchDir::new("missing-bucket");
        let (_, kept) =
            write_new_object(dir.path(), Bucket::Submissions, 3, 1_000, ".png", b"dato").unwrap();

        // 桶目录不存在时写入失败，已有对象不受影响
        assert!(write_new_object(dir.path(), Bucket::Exercises, 3, 1_000, ".png", b"x").is_err());
        assert_eq!(fs::read(kept).unwrap(), b"dato");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("Foto.JPG"), ".jpg");
        assert_eq!(extension_of("sin_extension"), "");
    }
}
