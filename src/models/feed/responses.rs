use serde::Serialize;
use ts_rs::TS;

use super::requests::FeedTab;
use crate::models::exercises::entities::Exercise;
use crate::models::profiles::entities::{Capabilities, ProfileRole};
use crate::models::submissions::entities::Submission;

/// 带有当前用户操作权限的练习
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feed.ts")]
pub struct ExerciseFeedItem {
    pub exercise: Exercise,
    pub can_delete: bool,
    pub can_answer: bool,
}

/// 主页视图
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feed.ts")]
pub struct FeedResponse {
    pub role: ProfileRole,
    pub heading: String,
    pub tab: FeedTab,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercises: Option<Vec<ExerciseFeedItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submissions: Option<Vec<Submission>>,
    pub capabilities: Capabilities,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feed.ts")]
pub struct MattersResponse {
    pub matters: Vec<String>,
}
