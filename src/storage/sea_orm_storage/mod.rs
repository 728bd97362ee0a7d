//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod exercises;
mod files;
mod profiles;
mod submissions;

use crate::config::AppConfig;
use crate::errors::{BecanizadoError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            Duration::from_secs(config.database.timeout),
        )
        .await
    }

    /// 按给定参数连接数据库并执行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: Duration) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| BecanizadoError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout: Duration,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| BecanizadoError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(timeout)
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| BecanizadoError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(
        url: &str,
        pool_size: u32,
        timeout: Duration,
    ) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(1)
            .connect_timeout(timeout)
            .acquire_timeout(timeout)
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| BecanizadoError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(BecanizadoError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    exercises::{entities::Exercise, requests::CreateExerciseRequest},
    files::entities::{Bucket, NewStoredFile, StoredFile},
    profiles::{entities::Profile, requests::CreateProfileRequest},
    submissions::{entities::Submission, requests::CreateSubmissionRequest},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户资料模块
    async fn create_profile(&self, profile: CreateProfileRequest) -> Result<Profile> {
        self.create_profile_impl(profile).await
    }

    async fn get_profile_by_id(&self, id: i64) -> Result<Option<Profile>> {
        self.get_profile_by_id_impl(id).await
    }

    async fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
        self.get_profile_by_email_impl(email).await
    }

    async fn count_profiles(&self) -> Result<u64> {
        self.count_profiles_impl().await
    }

    // 练习模块
    async fn create_exercise(
        &self,
        professor_id: i64,
        exercise: CreateExerciseRequest,
    ) -> Result<Exercise> {
        self.create_exercise_impl(professor_id, exercise).await
    }

    async fn get_exercise_by_id(&self, id: i64) -> Result<Option<Exercise>> {
        self.get_exercise_by_id_impl(id).await
    }

    async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        self.list_exercises_impl().await
    }

    async fn delete_exercise(&self, id: i64, professor_id: i64) -> Result<bool> {
        self.delete_exercise_impl(id, professor_id).await
    }

    // 答案模块
    async fn create_submission(
        &self,
        exercise_id: i64,
        student_id: i64,
        submission: CreateSubmissionRequest,
    ) -> Result<Submission> {
        self.create_submission_impl(exercise_id, student_id, submission)
            .await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn list_submissions(&self) -> Result<Vec<Submission>> {
        self.list_submissions_impl().await
    }

    async fn list_submissions_by_exercise(&self, exercise_id: i64) -> Result<Vec<Submission>> {
        self.list_submissions_by_exercise_impl(exercise_id).await
    }

    async fn update_submission_feedback(
        &self,
        id: i64,
        feedback: &str,
    ) -> Result<Option<Submission>> {
        self.update_submission_feedback_impl(id, feedback).await
    }

    async fn delete_submission(&self, id: i64) -> Result<bool> {
        self.delete_submission_impl(id).await
    }

    // 文件模块
    async fn create_file(&self, file: NewStoredFile) -> Result<StoredFile> {
        self.create_file_impl(file).await
    }

    async fn get_file(&self, bucket: Bucket, object_name: &str) -> Result<Option<StoredFile>> {
        self.get_file_impl(bucket, object_name).await
    }
}
