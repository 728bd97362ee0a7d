use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 频道中的一个视频
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/channel.ts")]
pub struct ChannelVideo {
    pub title: String,
    pub link: String,
    pub thumbnail: String,
    pub pub_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/channel.ts")]
pub struct ChannelVideosResponse {
    pub channel_id: String,
    pub items: Vec<ChannelVideo>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/channel.ts")]
pub struct ChannelVideosParams {
    pub channel_id: Option<String>,
}
