pub mod download;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::files::entities::Bucket;
use crate::storage::Storage;

pub struct FileService {
    storage: Option<Arc<dyn Storage>>,
}

impl FileService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 上传图片到存储桶
    pub async fn handle_upload(
        &self,
        request: &HttpRequest,
        bucket: Bucket,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, bucket, payload).await
    }

    // 读取公开对象
    pub async fn handle_download(
        &self,
        request: &HttpRequest,
        bucket: Bucket,
        object_name: String,
    ) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, bucket, object_name).await
    }
}

/// 对象在磁盘上的位置 `{upload.dir}/{bucket}/{name}`
pub(crate) fn object_path(upload_dir: &str, bucket: Bucket, object_name: &str) -> PathBuf {
    PathBuf::from(upload_dir).join(bucket.as_str()).join(object_name)
}

/// 对象的公开访问地址
pub fn public_url(base_url: &str, bucket: Bucket, object_name: &str) -> String {
    format!(
        "{}/api/v1/storage/{}/{}",
        base_url.trim_end_matches('/'),
        bucket,
        object_name
    )
}

pub(crate) fn public_url_from_config(bucket: Bucket, object_name: &str) -> String {
    public_url(&AppConfig::get().upload.public_base_url, bucket, object_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url() {
        assert_eq!(
            public_url("http://localhost:8080/", Bucket::Submissions, "3-1700000000000.png"),
            "http://localhost:8080/api/v1/storage/submissions/3-1700000000000.png"
        );
    }

    #[test]
    fn test_object_path() {
        let path = object_path("uploads", Bucket::Exercises, "1-2.jpg");
        assert_eq!(path, PathBuf::from("uploads/exercises/1-2.jpg"));
    }
}
