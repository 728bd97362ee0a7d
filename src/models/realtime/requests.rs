use serde::Deserialize;
use ts_rs::TS;

/// WebSocket 握手参数；浏览器无法在握手时附带请求头，token 通过查询参数传递
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/realtime.ts")]
pub struct RealtimeParams {
    pub token: String,
    /// 逗号分隔的表名，为空时订阅全部
    pub tables: Option<String>,
}
