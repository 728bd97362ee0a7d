//! 查询缓存失效监听

use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::RealtimeHub;
use crate::cache::{QueryCache, QueryKey};
use crate::models::realtime::entities::{ChangeEvent, ChangeTable};

/// 某个变更事件会影响到的查询键
pub fn invalidation_keys(event: &ChangeEvent) -> Vec<QueryKey> {
    match event.table {
        ChangeTable::Exercises => vec![QueryKey::Exercises],
        ChangeTable::Submissions => {
            let mut keys = vec![QueryKey::Submissions];
            if let Some(exercise_id) = event.exercise_id {
                keys.push(QueryKey::ExerciseSubmissions(exercise_id));
            }
            keys
        }
    }
}

pub async fn apply_change(cache: &QueryCache, event: &ChangeEvent) {
    for key in invalidation_keys(event) {
        cache.invalidate(&key).await;
    }
}

/// 订阅事件中心，把收到的变更转换为缓存失效
pub fn spawn_invalidation_listener(hub: &RealtimeHub, cache: Arc<QueryCache>) -> JoinHandle<()> {
    let mut rx = hub.subscribe();

    tokio::spawn(async move {
        info!("Query cache invalidation listener started");
        loop {
            match rx.recv().await {
                Ok(event) => {
                    debug!("Invalidating queries for {:?} {:?}", event.table, event.event);
                    apply_change(&cache, &event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // 丢失的事件无法还原，所有查询一并失效
                    warn!("Invalidation listener lagged by {} events", n);
                    cache.invalidate_all();
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        info!("Query cache invalidation listener stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::errors::BecanizadoError;
    use crate::models::realtime::entities::ChangeKind;
    use std::time::Duration;

    fn query_cache() -> Arc<QueryCache> {
        let backend = Arc::new(MokaCacheWrapper::with_settings(100, Duration::from_secs(60)));
        Arc::new(QueryCache::new(backend, Duration::from_secs(300)))
    }

    #[test]
    fn test_invalidation_keys() {
        assert_eq!(
            invalidation_keys(&ChangeEvent::exercise(ChangeKind::Insert, 1)),
            vec![QueryKey::Exercises]
        );
        assert_eq!(
            invalidation_keys(&ChangeEvent::submission(ChangeKind::Update, 5, 2)),
            vec![QueryKey::Submissions, QueryKey::ExerciseSubmissions(2)]
        );
        assert_eq!(
            invalidation_keys(&ChangeEvent::new(
                ChangeTable::Submissions,
                ChangeKind::Delete,
                5
            )),
            vec![QueryKey::Submissions]
        );
    }

    #[tokio::test]
    async fn test_apply_change_forces_refetch() {
        let cache = query_cache();
        let key = QueryKey::ExerciseSubmissions(2);
        cache
            .fetch(&key, || async { Ok::<_, BecanizadoError>(vec![1i64]) })
            .await
            .unwrap();

        apply_change(&cache, &ChangeEvent::submission(ChangeKind::Insert, 9, 2)).await;

        let refreshed = cache
            .fetch(&key, || async { Ok::<_, BecanizadoError>(vec![9i64, 1]) })
            .await
            .unwrap();
        assert_eq!(refreshed, vec![9, 1]);
    }

    #[tokio::test]
    async fn test_listener_invalidates_on_publish() {
        let hub = RealtimeHub::new();
        let cache = query_cache();
        cache
            .fetch(&QueryKey::Exercises, || async {
                Ok::<_, BecanizadoError>(vec![1i64])
            })
            .await
            .unwrap();

        let handle = spawn_invalidation_listener(&hub, cache.clone());
        hub.publish(ChangeEvent::exercise(ChangeKind::Insert, 2));

        let mut refetched = false;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let data = cache
                .fetch(&QueryKey::Exercises, || async {
                    Ok::<_, BecanizadoError>(vec![2i64, 1])
                })
                .await
                .unwrap();
            if data == vec![2, 1] {
                refetched = true;
                break;
            }
        }
        assert!(refetched);
        handle.abort();
    }

    #[tokio::test]
    async fn test_lagged_listener_invalidates_per_exercise_lists() {
        let hub = RealtimeHub::new();
        let cache = query_cache();
        let key = QueryKey::ExerciseSubmissions(2);
        cache
            .fetch(&key, || async { Ok::<_, BecanizadoError>(vec![1i64]) })
            .await
            .unwrap();

        let handle = spawn_invalidation_listener(&hub, cache.clone());
        // 不让出执行权，监听任务来不及消费，事件被挤出缓冲区
        for id in 0..10 {
            hub.publish(ChangeEvent::submission(ChangeKind::Insert, 100 + id, 2));
        }
        for id in 0..300 {
            hub.publish(ChangeEvent::exercise(ChangeKind::Update, id));
        }

        let mut refetched = false;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let data = cache
                .fetch(&key, || async { Ok::<_, BecanizadoError>(vec![9i64, 1]) })
                .await
                .unwrap();
            if data == vec![9, 1] {
                refetched = true;
                break;
            }
        }
        assert!(refetched);
        handle.abort();
    }
}
