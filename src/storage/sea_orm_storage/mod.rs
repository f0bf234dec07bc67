//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod metrics;
mod photos;
mod users;
mod votes;

use crate::config::AppConfig;
use crate::errors::{PhotoVoteError, Result};
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
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
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
            .map_err(|e| PhotoVoteError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| PhotoVoteError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .pragma("temp_store", "memory");

        // 内存库只存在于单个连接中，不启用 WAL
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { pool_size })
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout));

        pool_options = if in_memory {
            pool_options.idle_timeout(None).max_lifetime(None)
        } else {
            pool_options.idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .connect_with(opt)
            .await
            .map_err(|e| PhotoVoteError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(pool_size.min(5))
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| PhotoVoteError::database_connection(format!("无法连接到数据库: {e}")))
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
            Err(PhotoVoteError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 测试用内存数据库
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Self {
        Self::connect(":memory:", 1, 5)
            .await
            .expect("failed to open in-memory sqlite")
    }
}

/// 将写入时的数据库约束错误映射为业务错误
pub(crate) fn map_write_error(err: sea_orm::DbErr, what: &str) -> PhotoVoteError {
    use sea_orm::SqlErr;

    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            PhotoVoteError::conflict(format!("{what}冲突: {detail}"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            PhotoVoteError::not_found(format!("{what}引用的记录不存在: {detail}"))
        }
        _ => PhotoVoteError::database_operation(format!("{what}失败: {err}")),
    }
}

// Storage trait 实现
use crate::models::{
    metrics::{
        entities::Metric,
        requests::{CreateMetricRequest, UpdateMetricRequest},
    },
    photos::{
        entities::Photo,
        requests::{PhotoListQuery, UpdatePhotoRequest},
        responses::PhotoListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
    votes::{
        entities::{Rating, Vote},
        requests::{JudgedPhotoQuery, VoteListQuery},
        responses::JudgedPhotoListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_key(&self, key: &str) -> Result<Option<User>> {
        self.get_user_by_key_impl(key).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 照片模块
    async fn create_photo(&self, username: &str, image_url: &str) -> Result<Photo> {
        self.create_photo_impl(username, image_url).await
    }

    async fn get_photo_by_id(&self, id: i64) -> Result<Option<Photo>> {
        self.get_photo_by_id_impl(id).await
    }

    async fn list_photos_with_pagination(
        &self,
        query: PhotoListQuery,
    ) -> Result<PhotoListResponse> {
        self.list_photos_with_pagination_impl(query).await
    }

    async fn list_all_photos(&self, active: Option<bool>) -> Result<Vec<Photo>> {
        self.list_all_photos_impl(active).await
    }

    async fn update_photo(&self, id: i64, update: UpdatePhotoRequest) -> Result<Option<Photo>> {
        self.update_photo_impl(id, update).await
    }

    async fn delete_photo(&self, id: i64) -> Result<bool> {
        self.delete_photo_impl(id).await
    }

    async fn list_eligible_photo_ids(&self, judge_id: i64) -> Result<Vec<i64>> {
        self.list_eligible_photo_ids_impl(judge_id).await
    }

    // 评分维度模块
    async fn create_metric(&self, metric: CreateMetricRequest) -> Result<Metric> {
        self.create_metric_impl(metric).await
    }

    async fn get_metric_by_id(&self, id: i64) -> Result<Option<Metric>> {
        self.get_metric_by_id_impl(id).await
    }

    async fn list_metrics(&self) -> Result<Vec<Metric>> {
        self.list_metrics_impl().await
    }

    async fn update_metric(
        &self,
        id: i64,
        update: UpdateMetricRequest,
    ) -> Result<Option<Metric>> {
        self.update_metric_impl(id, update).await
    }

    async fn delete_metric(&self, id: i64) -> Result<bool> {
        self.delete_metric_impl(id).await
    }

    // 投票模块
    async fn insert_votes(
        &self,
        judge_id: i64,
        photo_id: i64,
        ratings: &[Rating],
    ) -> Result<Vec<Vote>> {
        self.insert_votes_impl(judge_id, photo_id, ratings).await
    }

    async fn upsert_votes(
        &self,
        judge_id: i64,
        photo_id: i64,
        ratings: &[Rating],
    ) -> Result<Vec<Vote>> {
        self.upsert_votes_impl(judge_id, photo_id, ratings).await
    }

    async fn list_votes(&self, query: VoteListQuery) -> Result<Vec<Vote>> {
        self.list_votes_impl(query).await
    }

    async fn list_judged_photos(
        &self,
        judge_id: i64,
        query: JudgedPhotoQuery,
    ) -> Result<JudgedPhotoListResponse> {
        self.list_judged_photos_impl(judge_id, query).await
    }
}
