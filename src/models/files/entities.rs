use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 存储桶
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub enum Bucket {
    Exercises,   // 练习配图
    Submissions, // 答案图片
}

impl Bucket {
    pub const EXERCISES: &'static str = "exercises";
    pub const SUBMISSIONS: &'static str = "submissions";

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Exercises => Self::EXERCISES,
            Bucket::Submissions => Self::SUBMISSIONS,
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Bucket::EXERCISES => Ok(Bucket::Exercises),
            Bucket::SUBMISSIONS => Ok(Bucket::Submissions),
            _ => Err(format!("Invalid bucket: {s}")),
        }
    }
}

/// 已上传的对象
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct StoredFile {
    pub id: i64,
    pub bucket: Bucket,
    // 桶内对象名 `{profile_id}-{unix_millis}.{ext}`
    pub object_name: String,
    pub original_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub owner_id: i64,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

/// 写入文件记录所需的字段
#[derive(Debug, Clone)]
pub struct NewStoredFile {
    pub bucket: Bucket,
    pub object_name: String,
    pub original_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub owner_id: i64,
}
