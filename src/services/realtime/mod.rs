/*!
 * 实时变更通知
 *
 * 每次写操作都会在进程内广播一个 `ChangeEvent`：
 * - 失效监听任务据此把查询缓存中受影响的键标记为失效
 * - WebSocket 客户端按表订阅，收到后自行刷新
 *
 * ## 连接
 *
 * ```text
 * ws://host/api/v1/realtime?token=<access_token>&tables=exercises,submissions
 * ```
 *
 * ## 消息格式
 *
 * ```json
 * {"type": "connected", "profile_id": 1}
 * {"type": "change", "table": "submissions", "event": "INSERT", "id": 9, "exercise_id": 3, "at": "..."}
 * {"type": "ping"}
 * {"type": "pong"}
 * ```
 */

pub mod listener;
pub mod session;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use tokio::sync::broadcast;
use tracing::debug;

use crate::models::realtime::entities::{ChangeEvent, ChangeTable};

pub use listener::{invalidation_keys, spawn_invalidation_listener};
pub use session::RealtimeService;

const CHANNEL_CAPACITY: usize = 256;

/// 全局事件中心
static REALTIME_HUB: Lazy<RealtimeHub> = Lazy::new(RealtimeHub::new);

pub struct RealtimeHub {
    sender: broadcast::Sender<ChangeEvent>,
    /// 用户资料 ID -> 在线连接数
    sessions: DashMap<i64, usize>,
}

impl RealtimeHub {
    pub(crate) fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            sessions: DashMap::new(),
        }
    }

    /// 获取全局实例
    pub fn get() -> &'static Self {
        &REALTIME_HUB
    }

    /// 广播变更事件，没有订阅者时事件被丢弃
    pub fn publish(&self, event: ChangeEvent) {
        match self.sender.send(event) {
            Ok(receivers) => debug!("Change event delivered to {} receivers", receivers),
            Err(broadcast::error::SendError(event)) => {
                debug!("No receivers for change event on {:?}", event.table)
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    pub(crate) fn register_session(&self, profile_id: i64) {
        *self.sessions.entry(profile_id).or_insert(0) += 1;
    }

    pub(crate) fn unregister_session(&self, profile_id: i64) {
        if let Some(mut count) = self.sessions.get_mut(&profile_id) {
            *count = count.saturating_sub(1);
        }
        self.sessions.remove_if(&profile_id, |_, count| *count == 0);
    }

    /// 在线用户数
    pub fn online_count(&self) -> usize {
        self.sessions.len()
    }
}

/// 解析 `tables=exercises,submissions`，为空时订阅全部表
pub fn parse_tables(raw: Option<&str>) -> Result<HashSet<ChangeTable>, String> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(HashSet::from([ChangeTable::Exercises, ChangeTable::Submissions]));
    }

    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}
