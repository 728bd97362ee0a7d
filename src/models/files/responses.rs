use serde::Serialize;
use ts_rs::TS;

use super::entities::Bucket;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct FileUploadResponse {
    /// 存储桶
    pub bucket: Bucket,
    /// 桶内对象名
    pub name: String,
    /// 公开访问地址
    pub public_url: String,
    /// 文件大小(字节)
    pub size: i64,
    pub content_type: String,
}
