use crate::cache::register::create_object_cache;
use crate::cache::{ObjectCache, QueryCache};
use crate::config::AppConfig;
use crate::models::profiles::entities::ProfileRole;
use crate::models::profiles::requests::CreateProfileRequest;
use crate::services::realtime::{RealtimeHub, spawn_invalidation_listener};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

const FALLBACK_CACHE: &str = "moka";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub query_cache: Arc<QueryCache>,
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> crate::errors::Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    match create_object_cache(cache_type).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            return Ok(Arc::from(cache));
        }
        Err(e) => warn!("Failed to create {} cache: {}", cache_type, e),
    }

    if cache_type == FALLBACK_CACHE {
        return Err(crate::errors::BecanizadoError::cache_connection(format!(
            "No cache backend available (tried: {cache_type})"
        )));
    }

    warn!("Falling back to memory cache");
    let cache = create_object_cache(FALLBACK_CACHE).await?;
    warn!("Successfully created fallback Moka (in-memory) cache backend");
    Ok(Arc::from(cache))
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 初始化教师账号
/// 数据库中没有任何用户时创建一个教师账号，供首次登录发布练习
async fn seed_professor(storage: &Arc<dyn Storage>) {
    let auth = &AppConfig::get().auth;
    if auth.seed_professor_email.trim().is_empty() {
        debug!("Seed professor email not configured, skipping seed");
        return;
    }

    match storage.count_profiles().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} profile(s), skipping professor seed",
                count
            );
            return;
        }
        Ok(_) => info!("No profiles found in database, creating professor account..."),
        Err(e) => {
            warn!("Failed to count profiles: {}, skipping professor seed", e);
            return;
        }
    }

    // 获取密码：优先从环境变量，否则生成随机密码
    let password = std::env::var("SEED_PROFESSOR_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  PROFESSOR PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated professor password: {}", pwd);
        warn!("  Please save this password or set SEED_PROFESSOR_PASSWORD");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash professor password: {}, skipping seed", e);
            return;
        }
    };

    let request = CreateProfileRequest {
        email: auth.seed_professor_email.trim().to_lowercase(),
        password: password_hash,
        full_name: auth.seed_professor_name.clone(),
        role: Some(ProfileRole::Professor),
        youtube_channel: None,
    };

    match storage.create_profile(request).await {
        Ok(profile) => info!(
            "Professor account created successfully (ID: {}, email: {})",
            profile.id, profile.email
        ),
        Err(e) => warn!("Failed to create professor account: {}", e),
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存、查询缓存与实时失效监听
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    // 初始化教师账号（如果需要）
    seed_professor(&storage).await;

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    let query_cache = Arc::new(QueryCache::from_config(cache.clone()));
    spawn_invalidation_listener(RealtimeHub::get(), query_cache.clone());
    warn!("Realtime invalidation listener started");

    StartupContext {
        storage,
        cache,
        query_cache,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_password() {
        let pwd = generate_random_password(16);
        assert_eq!(pwd.chars().count(), 16);
        assert_ne!(pwd, generate_random_password(16));
    }

    #[tokio::test]
    async fn test_seed_professor_only_on_empty_database() {
        let storage: Arc<dyn Storage> = Arc::new(
            crate::storage::sea_orm_storage::test_support::memory_storage().await,
        );

        seed_professor(&storage).await;
        seed_professor(&storage).await;

        assert_eq!(storage.count_profiles().await.unwrap(), 1);
        let email = AppConfig::get().auth.seed_professor_email.trim().to_lowercase();
        let profile = storage.get_profile_by_email(&email).await.unwrap().unwrap();
        assert!(profile.is_professor());
    }
}
