//! 查询结果缓存
//!
//! 每个查询键保存一份 `{ data, updated_at }`：
//! - 在新鲜期 (`stale_time`) 内直接返回缓存数据
//! - 过期或被标记失效后，下一次读取重新执行查询
//! - `invalidate_all` 之前写入的条目全部视为失效
//! - 查询失败时不写入缓存
//! - 长时间未访问的条目由底层缓存后端按 `gc_time` 回收

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::errors::Result;

/// 查询键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// 全部练习
    Exercises,
    /// 全部答案（教师视图）
    Submissions,
    /// 某个练习下的答案
    ExerciseSubmissions(i64),
    /// 频道视频列表
    ChannelVideos(String),
}

impl QueryKey {
    pub fn as_cache_key(&self) -> String {
        format!("query:{self}")
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryKey::Exercises => write!(f, "exercises"),
            QueryKey::Submissions => write!(f, "submissions"),
            QueryKey::ExerciseSubmissions(id) => write!(f, "submissions:exercise:{id}"),
            QueryKey::ChannelVideos(channel_id) => write!(f, "channel:{channel_id}"),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct QueryEntry<T> {
    data: T,
    updated_at: i64, // 毫秒
    #[serde(default)]
    invalidated: bool,
}

pub struct QueryCache {
    backend: Arc<dyn ObjectCache>,
    stale_time: Duration,
    // 毫秒，不晚于此刻写入的条目视为失效
    invalidated_before: AtomicI64,
}

impl QueryCache {
    pub fn new(backend: Arc<dyn ObjectCache>, stale_time: Duration) -> Self {
        Self {
            backend,
            stale_time,
            invalidated_before: AtomicI64::new(i64::MIN),
        }
    }

    pub fn from_config(backend: Arc<dyn ObjectCache>) -> Self {
        let config = AppConfig::get();
        Self::new(backend, Duration::from_secs(config.cache.stale_time))
    }

    /// 读取查询结果，缓存缺失、过期或失效时执行 `fetcher` 并写回
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(entry) = self.read_entry::<T>(key).await {
            if self.is_fresh(&entry) {
                debug!("Query cache hit: {}", key);
                return Ok(entry.data);
            }
            debug!("Query cache stale: {}", key);
        }

        let data = fetcher().await?;
        self.write_entry(key, &data).await;
        Ok(data)
    }

    /// 读取已缓存的数据（不论是否新鲜）
    pub async fn get_query_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        self.read_entry(key).await.map(|entry| entry.data)
    }

    /// 就地更新已缓存的数据；键不存在时不做任何事，返回是否发生了更新
    pub async fn set_query_data<T, F>(&self, key: &QueryKey, updater: F) -> bool
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(T) -> T,
    {
        match self.read_entry::<T>(key).await {
            Some(entry) => {
                let data = updater(entry.data);
                self.write_entry(key, &data).await;
                true
            }
            None => false,
        }
    }

    /// 标记失效：保留数据，下一次 `fetch` 时重新查询
    pub async fn invalidate(&self, key: &QueryKey) {
        let cache_key = key.as_cache_key();
        let raw = match self.backend.get_raw(&cache_key).await {
            CacheResult::Found(raw) => raw,
            _ => return,
        };

        match serde_json::from_str::<QueryEntry<serde_json::Value>>(&raw) {
            Ok(mut entry) => {
                entry.invalidated = true;
                match serde_json::to_string(&entry) {
                    Ok(raw) => self.backend.insert_raw(cache_key, raw, 0).await,
                    Err(_) => self.backend.remove(&cache_key).await,
                }
                debug!("Query invalidated: {}", key);
            }
            Err(_) => self.backend.remove(&cache_key).await,
        }
    }

    /// 让所有已缓存的查询失效，数据保留
    ///
    /// 用于无法确定哪些键受影响的场合，例如丢失了变更事件。
    pub fn invalidate_all(&self) {
        self.invalidated_before
            .fetch_max(chrono::Utc::now().timestamp_millis(), Ordering::SeqCst);
        debug!("All queries invalidated");
    }

    /// 直接丢弃缓存条目
    pub async fn remove(&self, key: &QueryKey) {
        self.backend.remove(&key.as_cache_key()).await;
    }

    fn is_fresh<T>(&self, entry: &QueryEntry<T>) -> bool {
        if entry.invalidated || entry.updated_at <= self.invalidated_before.load(Ordering::SeqCst)
        {
            return false;
        }
        let age = chrono::Utc::now().timestamp_millis() - entry.updated_at;
        age >= 0 && (age as u128) < self.stale_time.as_millis()
    }

    async fn read_entry<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<QueryEntry<T>> {
        let cache_key = key.as_cache_key();
        match self.backend.get_raw(&cache_key).await {
            CacheResult::Found(raw) => match serde_json::from_str(&raw) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Discarding unreadable query cache entry {}: {}", key, e);
                    self.backend.remove(&cache_key).await;
                    None
                }
            },
            _ => None,
        }
    }

    async fn write_entry<T: Serialize>(&self, key: &QueryKey, data: &T) {
        let entry = QueryEntry {
            data,
            updated_at: chrono::Utc::now().timestamp_millis(),
            invalidated: false,
        };
        match serde_json::to_string(&entry) {
            Ok(raw) => self.backend.insert_raw(key.as_cache_key(), raw, 0).await,
            Err(e) => warn!("Failed to serialize query data for {}: {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::errors::BecanizadoError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache(stale_time: Duration) -> QueryCache {
        let backend = Arc::new(MokaCacheWrapper::with_settings(
            100,
            Duration::from_secs(60),
        ));
        QueryCache::new(backend, stale_time)
    }

    async fn counted_fetch(
        cache: &QueryCache,
        calls: &AtomicUsize,
        value: Vec<i64>,
    ) -> Result<Vec<i64>> {
        cache
            .fetch(&QueryKey::Exercises, || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            })
            .await
    }

    #[test]
    fn test_query_key_format() {
        assert_eq!(QueryKey::Exercises.to_string(), "exercises");
        assert_eq!(
            QueryKey::ExerciseSubmissions(12).to_string(),
            "submissions:exercise:12"
        );
        assert_eq!(
            QueryKey::ChannelVideos("UC1".to_string()).as_cache_key(),
            "query:channel:UC1"
        );
    }

    #[tokio::test]
    async fn test_fresh_data_is_served_from_cache() {
        let cache = cache(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);

        assert_eq!(counted_fetch(&cache, &calls, vec![1]).await.unwrap(), vec![1]);
        assert_eq!(counted_fetch(&cache, &calls, vec![2]).await.unwrap(), vec![1]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_data_is_refetched() {
        let cache = cache(Duration::ZERO);
        let calls = AtomicUsize::new(0);

        counted_fetch(&cache, &calls, vec![1]).await.unwrap();
        assert_eq!(counted_fetch(&cache, &calls, vec![2]).await.unwrap(), vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch_but_keeps_data() {
        let cache = cache(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);

        counted_fetch(&cache, &calls, vec![1]).await.unwrap();
        cache.invalidate(&QueryKey::Exercises).await;

        assert_eq!(
            cache.get_query_data::<Vec<i64>>(&QueryKey::Exercises).await,
            Some(vec![1])
        );
        assert_eq!(counted_fetch(&cache, &calls, vec![3]).await.unwrap(), vec![3]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_errors_are_not_cached() {
        let cache = cache(Duration::from_secs(300));
        let result: Result<Vec<i64>> = cache
            .fetch(&QueryKey::Submissions, || async {
                Err(BecanizadoError::database_operation("boom"))
            })
            .await;
        assert!(result.is_err());
        assert!(
            cache
                .get_query_data::<Vec<i64>>(&QueryKey::Submissions)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_set_query_data_requires_existing_entry() {
        let cache = cache(Duration::from_secs(300));
        let updated = cache
            .set_query_data(&QueryKey::Exercises, |mut items: Vec<i64>| {
                items.insert(0, 9);
                items
            })
            .await;
        assert!(!updated);
        assert!(
            cache
                .get_query_data::<Vec<i64>>(&QueryKey::Exercises)
                .await
                .is_none()
        );

        let calls = AtomicUsize::new(0);
        counted_fetch(&cache, &calls, vec![1, 2]).await.unwrap();
        let updated = cache
            .set_query_data(&QueryKey::Exercises, |mut items: Vec<i64>| {
                items.insert(0, 9);
                items
            })
            .await;
        assert!(updated);
        assert_eq!(counted_fetch(&cache, &calls, vec![]).await.unwrap(), vec![9, 1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_all_covers_every_key() {
        let cache = cache(Duration::from_secs(300));
        let per_exercise = QueryKey::ExerciseSubmissions(2);
        cache
            .fetch(&per_exercise, || async { Ok::<_, BecanizadoError>(vec![1i64]) })
            .await
            .unwrap();
        let calls = AtomicUsize::new(0);
        counted_fetch(&cache, &calls, vec![1]).await.unwrap();

        cache.invalidate_all();

        assert_eq!(
            cache.get_query_data::<Vec<i64>>(&per_exercise).await,
            Some(vec![1])
        );
        let refreshed = cache
            .fetch(&per_exercise, || async { Ok::<_, BecanizadoError>(vec![9i64, 1]) })
            .await
            .unwrap();
        assert_eq!(refreshed, vec![9, 1]);
        assert_eq!(counted_fetch(&cache, &calls, vec![2]).await.unwrap(), vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_remove_drops_entry() {
        let cache = cache(Duration::from_secs(300));
        let key = QueryKey::ExerciseSubmissions(4);
        cache
            .fetch(&key, || async { Ok::<_, BecanizadoError>(vec![1i64]) })
            .await
            .unwrap();
        cache.remove(&key).await;
        assert!(cache.get_query_data::<Vec<i64>>(&key).await.is_none());
    }
}
