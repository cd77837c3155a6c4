//! Store backends selected by configuration

use std::sync::Arc;

use weview_cache::{
    MemoryGuestCounter, MemoryPresenceStore, RedisGuestCounter, RedisPool, RedisPresenceStore,
    RedisPublisher,
};
use weview_common::{AppConfig, AppError, PresenceBackend, StorageBackend};
use weview_core::traits::EventPublisher;
use weview_db::{
    create_pool, ensure_schema, MemoryFriendGraphStore, MemoryUserRepository, PgFriendGraphStore,
    PgPool, PgUserRepository, PoolConfig,
};
use weview_service::{RetryPolicy, ServiceContextBuilder};

use crate::registry::TopicRegistry;

/// Connection pools behind the configured stores
#[derive(Clone, Default)]
pub struct Backends {
    pub postgres: Option<PgPool>,
    pub redis: Option<RedisPool>,
}

impl Backends {
    /// Ping each configured backend; `None` for backends not in use
    pub async fn health(&self) -> (Option<bool>, Option<bool>) {
        let database = match &self.postgres {
            Some(pool) => Some(weview_db::pool::health_check(pool).await.is_ok()),
            None => None,
        };
        let redis = match &self.redis {
            Some(pool) => Some(pool.health_check().await.is_ok()),
            None => None,
        };
        (database, redis)
    }
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends")
            .field("postgres", &self.postgres.is_some())
            .field("redis", &self.redis.is_some())
            .finish()
    }
}

/// Build the service context for `config`
///
/// With Redis presence, events are published on the Redis bus; otherwise the
/// local registry is the publisher.
pub(crate) async fn assemble(
    config: &AppConfig,
    registry: &Arc<TopicRegistry>,
) -> Result<(ServiceContextBuilder, Backends), AppError> {
    let mut backends = Backends::default();
    let mut builder =
        ServiceContextBuilder::new().retry_policy(RetryPolicy::from_config(&config.social));

    builder = match config.storage {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory user and friend graph storage");
            builder
                .user_repo(Arc::new(MemoryUserRepository::new()))
                .friend_graph(Arc::new(MemoryFriendGraphStore::new()))
        }
        StorageBackend::Postgres => {
            let db_config = config
                .database
                .as_ref()
                .ok_or_else(|| AppError::Config("DATABASE_URL is required for postgres storage".to_string()))?;

            tracing::info!("Connecting to PostgreSQL...");
            let pool = create_pool(&PoolConfig::from(db_config))
                .await
                .map_err(|e| AppError::Store(e.to_string()))?;
            ensure_schema(&pool)
                .await
                .map_err(|e| AppError::Store(e.to_string()))?;
            tracing::info!("PostgreSQL connection established");

            backends.postgres = Some(pool.clone());
            builder
                .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
                .friend_graph(Arc::new(PgFriendGraphStore::new(pool)))
        }
    };

    builder = match config.presence {
        PresenceBackend::Memory => {
            tracing::info!("Using in-memory presence and local event relay");
            let publisher: Arc<dyn EventPublisher> = registry.clone();
            builder
                .presence_store(Arc::new(MemoryPresenceStore::new()))
                .guest_counter(Arc::new(MemoryGuestCounter::new()))
                .publisher(publisher)
        }
        PresenceBackend::Redis => {
            let redis_config = config
                .redis
                .as_ref()
                .ok_or_else(|| AppError::Config("REDIS_URL is required for redis presence".to_string()))?;

            let pool = RedisPool::from_config(redis_config).map_err(|e| AppError::Cache(e.to_string()))?;
            tracing::info!("Redis pool ready");

            backends.redis = Some(pool.clone());
            builder
                .presence_store(Arc::new(RedisPresenceStore::new(pool.clone())))
                .guest_counter(Arc::new(RedisGuestCounter::new(pool.clone())))
                .publisher(Arc::new(RedisPublisher::new(pool)))
        }
    };

    Ok((builder, backends))
}
