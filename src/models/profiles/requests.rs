use serde::Deserialize;
use ts_rs::TS;

use super::entities::ProfileRole;

// 注册请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct CreateProfileRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub role: Option<ProfileRole>,
    #[serde(default)]
    pub youtube_channel: Option<String>,
}
