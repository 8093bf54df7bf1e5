//! Redis-backed token cache with connection pooling.

use async_trait::async_trait;
use deadpool_redis::{Config as PoolConfig, Pool, Runtime};
use redis::AsyncCommands;
use std::time::Duration;

use super::TokenCache;
use crate::config::RedisConfig;
use crate::error::{AppError, ResultExt};

/// Token cache storing `token -> user_id` with `SET .. EX`.
#[derive(Clone)]
pub struct RedisTokenCache {
    pool: Pool,
}

impl RedisTokenCache {
    pub fn new(config: &RedisConfig) -> Result<Self, AppError> {
        let info = redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(config.host.clone(), config.port),
            redis: redis::RedisConnectionInfo {
                password: config.password.clone(),
                ..Default::default()
            },
        };
        Self::with_pool_config(PoolConfig::from_connection_info(info))
    }

    pub fn from_url(url: impl Into<String>) -> Result<Self, AppError> {
        Self::with_pool_config(PoolConfig::from_url(url))
    }

    fn with_pool_config(config: PoolConfig) -> Result<Self, AppError> {
        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| AppError::CacheError(format!("Failed to create Redis pool: {}", e)))?;
        Ok(Self { pool })
    }

    /// Round-trips a `PING`; used at startup to fail fast.
    pub async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.pool.get().await.context("pinging Redis")?;
        let _: () = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("pinging Redis")?;
        Ok(())
    }
}

/// Redis rejects `EX 0`, so sub-second lifetimes round up to one second.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl TokenCache for RedisTokenCache {
    async fn put(&self, token: &str, user_id: i64, ttl: Duration) -> Result<(), AppError> {
        let mut conn = self.pool.get().await.context("storing token")?;
        conn.set_ex::<_, _, ()>(token, user_id, ttl_seconds(ttl))
            .await
            .context("storing token")?;
        Ok(())
    }

    async fn contains(&self, token: &str) -> Result<bool, AppError> {
        let mut conn = self.pool.get().await.context("checking token")?;
        let exists: bool = conn.exists(token).await.context("checking token")?;
        Ok(exists)
    }

    async fn remove(&self, token: &str) -> Result<(), AppError> {
        let mut conn = self.pool.get().await.context("revoking token")?;
        conn.del::<_, ()>(token).await.context("revoking token")?;
        Ok(())
    }
}
