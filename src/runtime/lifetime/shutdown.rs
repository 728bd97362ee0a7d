use tokio::signal;
use tracing::warn;

use crate::services::RealtimeHub;

pub async fn listen_for_shutdown() {
    // 等待 Ctrl+C 信号
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    warn!(
        "Shutdown signal received, closing {} realtime session(s)...",
        RealtimeHub::get().online_count()
    );
}
