//! CLI 명령어 구현 모듈.

pub mod lookup;
pub mod resolve;
pub mod tickers;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use ticker_core::AppConfig;
use ticker_data::{MarketDataManager, MemoryCache, PriceCache, RedisCache, SqliteTickerTable};

/// 티커 테이블을 엽니다. `db_url`이 없으면 설정의 URL을 사용합니다.
pub async fn open_ticker_table(config: &AppConfig, db_url: Option<&str>) -> Result<SqliteTickerTable> {
    let url = db_url.unwrap_or(&config.database.url);
    let table = SqliteTickerTable::connect(url, config.database.max_connections)
        .await
        .with_context(|| format!("Failed to open ticker database: {}", url))?;
    table
        .ensure_schema()
        .await
        .context("Failed to prepare tickers table")?;
    Ok(table)
}

/// 설정에서 데이터 매니저를 생성합니다.
///
/// Redis가 설정되어 있으면 공유 캐시로 사용하고, 아니면 메모리 캐시를 사용합니다.
pub async fn build_manager(config: &AppConfig) -> Result<MarketDataManager> {
    let cache: Arc<dyn PriceCache> = match config.redis.url.as_deref() {
        Some(url) => {
            let timeout = Duration::from_secs(config.redis.connection_timeout_secs);
            match RedisCache::connect(url, timeout).await {
                Ok(cache) => Arc::new(cache),
                Err(e) => {
                    warn!("Redis unavailable ({}), using memory cache", e);
                    Arc::new(MemoryCache::new())
                }
            }
        }
        None => Arc::new(MemoryCache::new()),
    };

    let manager = MarketDataManager::from_config(config, cache)?;
    if manager.provider_names().is_empty() {
        warn!("No provider API keys configured. Set TICKER__PROVIDERS__FINNHUB__API_KEY etc.");
    } else {
        info!(providers = ?manager.provider_names(), "Providers ready");
    }
    Ok(manager)
}
