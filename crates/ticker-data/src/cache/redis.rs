//! Redis cache 구현.
//!
//! 여러 API 프로세스가 시세 캐시를 공유할 때 사용합니다.
//! 만료는 Redis의 `SET EX`가 처리합니다.

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use super::{CacheKey, PriceCache};
use crate::error::{DataError, Result};

/// Redis 연결 래퍼.
#[derive(Clone)]
pub struct RedisCache {
    connection: Arc<RwLock<MultiplexedConnection>>,
}

impl RedisCache {
    /// 새로운 Redis cache 연결을 생성합니다.
    pub async fn connect(url: &str, connection_timeout: Duration) -> Result<Self> {
        info!("Connecting to Redis...");

        let client = Client::open(url).map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let connection = tokio::time::timeout(
            connection_timeout,
            client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| DataError::ConnectionError("Redis connection timed out".to_string()))?
        .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        info!("Redis connection established");

        Ok(Self {
            connection: Arc::new(RwLock::new(connection)),
        })
    }
}

#[async_trait]
impl PriceCache for RedisCache {
    fn backend(&self) -> &'static str {
        "redis"
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>> {
        let mut conn = self.connection.write().await;
        let value: Option<String> = conn.get(key.to_string()).await?;

        match value {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, value), fields(key = %key, ttl_secs = ttl.as_secs()))]
    async fn set(&self, key: &CacheKey, value: &Value, ttl: Duration) -> Result<()> {
        // SET EX는 0초를 허용하지 않음
        let ttl_secs = ttl.as_secs().max(1);
        let json = serde_json::to_string(value)?;

        let mut conn = self.connection.write().await;
        let _: () = conn.set_ex(key.to_string(), json, ttl_secs).await?;

        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        let mut conn = self.connection.write().await;
        let result: String = redis::cmd("PING").query_async(&mut *conn).await?;

        Ok(result == "PONG")
    }
}
