//! WebSocket 会话

use actix_ws::Message;
use futures_util::StreamExt;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::RealtimeHub;
use crate::models::realtime::entities::{ChangeTable, RealtimeMessage};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

pub struct RealtimeService;

impl RealtimeService {
    /// 处理一个已完成握手的 WebSocket 连接，直到任一方关闭
    pub async fn handle_connection(
        profile_id: i64,
        tables: HashSet<ChangeTable>,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) {
        let hub = RealtimeHub::get();
        hub.register_session(profile_id);
        info!(
            "Realtime session opened for profile {} ({} online)",
            profile_id,
            hub.online_count()
        );

        let mut rx = hub.subscribe();

        if let Ok(json) = serde_json::to_string(&RealtimeMessage::Connected { profile_id }) {
            let _ = session.text(json).await;
        }

        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);

        loop {
            tokio::select! {
                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<RealtimeMessage>(&text) {
                                Ok(RealtimeMessage::Ping) => {
                                    let pong = serde_json::to_string(&RealtimeMessage::Pong)
                                        .unwrap_or_else(|_| r#"{"type":"pong"}"#.to_string());
                                    if session.text(pong).await.is_err() {
                                        break;
                                    }
                                }
                                Ok(other) => debug!("Ignoring message from profile {}: {:?}", profile_id, other),
                                Err(_) => debug!("Unreadable message from profile {}", profile_id),
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if session.pong(&data).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(e)) => {
                            warn!("Realtime session error for profile {}: {:?}", profile_id, e);
                            break;
                        }
                        _ => {}
                    }
                }

                event = rx.recv() => {
                    match event {
                        Ok(event) => {
                            if !tables.contains(&event.table) {
                                continue;
                            }
                            if let Ok(json) = serde_json::to_string(&RealtimeMessage::Change(event))
                                && session.text(json).await.is_err()
                            {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("Realtime session for profile {} lagged by {} events", profile_id, n);
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }

                _ = heartbeat.tick() => {
                    if session.ping(b"").await.is_err() {
                        break;
                    }
                }
            }
        }

        let _ = session.close(None).await;
        hub.unregister_session(profile_id);
        info!("Realtime session closed for profile {}", profile_id);
    }
}
