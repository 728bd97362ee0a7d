use serde::Deserialize;
use ts_rs::TS;

// 主页选项卡
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, serde::Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/feed.ts")]
pub enum FeedTab {
    #[default]
    Exercises, // 练习
    Responses, // 答案
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feed.ts")]
pub struct FeedParams {
    #[serde(default)]
    pub tab: FeedTab,
    pub search: Option<String>,
    pub matter: Option<String>,
}
