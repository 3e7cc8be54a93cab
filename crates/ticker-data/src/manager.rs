//! 데이터 매니저 구현.
//!
//! Provider 체인과 시세 캐시 사이를 조정합니다.
//! - 심볼 검색: 고정 대기 후 체인 호출 (캐시하지 않음)
//! - 최신 시세: 캐시 확인 → 체인 호출 → 캐시 저장
//! - 일봉 이력: 체인 호출 (캐시하지 않음)
//!
//! 캐시 읽기/쓰기 실패는 로그만 남기고 캐시 미스로 처리합니다.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn, Instrument};

use crate::cache::{CacheKey, PriceCache};
use crate::error::Result;
use crate::provider::ProviderChain;
use ticker_core::{lookup_span, normalize_ticker, AppConfig, PriceQuote, ProviderPayload};

/// 캐시와 Provider 상태.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// 캐시 백엔드 이름
    pub cache_backend: &'static str,
    /// 캐시 응답 여부
    pub cache: bool,
    /// 설정된 Provider (호출 순서)
    pub providers: Vec<&'static str>,
}

/// Provider 체인과 캐시를 조정하는 중앙 데이터 매니저.
#[derive(Clone)]
pub struct MarketDataManager {
    chain: ProviderChain,
    cache: Arc<dyn PriceCache>,
    price_ttl: Duration,
    search_throttle: Duration,
}

impl MarketDataManager {
    /// 새 데이터 매니저를 생성합니다.
    pub fn new(
        chain: ProviderChain,
        cache: Arc<dyn PriceCache>,
        price_ttl: Duration,
        search_throttle: Duration,
    ) -> Self {
        Self {
            chain,
            cache,
            price_ttl,
            search_throttle,
        }
    }

    /// 설정에서 Provider 체인을 구성하고 주어진 캐시와 묶습니다.
    pub fn from_config(config: &AppConfig, cache: Arc<dyn PriceCache>) -> Result<Self> {
        let chain = ProviderChain::from_config(&config.providers)?;
        info!(
            cache = cache.backend(),
            price_ttl_secs = config.cache.price_ttl_secs,
            "MarketDataManager initialized"
        );
        Ok(Self::new(
            chain,
            cache,
            Duration::from_secs(config.cache.price_ttl_secs),
            Duration::from_millis(config.providers.search_throttle_ms),
        ))
    }

    pub fn cache_backend(&self) -> &'static str {
        self.cache.backend()
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.chain.provider_names()
    }

    /// 캐시 상태와 Provider 구성을 확인합니다.
    pub async fn health_check(&self) -> HealthStatus {
        let cache = match self.cache.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!(backend = self.cache.backend(), error = %e, "Cache health check failed");
                false
            }
        };

        HealthStatus {
            cache_backend: self.cache.backend(),
            cache,
            providers: self.chain.provider_names(),
        }
    }

    // =========================================================================
    // 조회 작업
    // =========================================================================

    /// 회사명/키워드로 티커 심볼을 검색합니다.
    ///
    /// Provider 요청 한도를 지키기 위해 매 호출 전 고정 시간 대기합니다.
    #[instrument(skip(self))]
    pub async fn find_ticker(&self, company_name: &str) -> Option<String> {
        let query = company_name.trim();
        if query.is_empty() {
            return None;
        }

        if !self.search_throttle.is_zero() {
            tokio::time::sleep(self.search_throttle).await;
        }

        self.chain.search_symbol(query).await
    }

    /// 최신 시세를 조회합니다.
    ///
    /// 유효한 캐시 항목이 있으면 Provider를 호출하지 않습니다.
    pub async fn get_price(&self, ticker: &str) -> Option<ProviderPayload> {
        let ticker = normalize_ticker(ticker);
        if ticker.is_empty() {
            return None;
        }

        let span = lookup_span!("get_price", ticker);
        async {
            let key = CacheKey::price(&ticker);

            if let Some(payload) = self.cached_payload(&key).await {
                debug!(key = %key, provider = %payload.provider, "Price cache hit");
                return Some(payload);
            }

            let payload = self.chain.latest_price(&ticker).await?;
            self.store_payload(&key, &payload).await;
            Some(payload)
        }
        .instrument(span)
        .await
    }

    /// 일봉 이력을 조회합니다.
    ///
    /// `days`가 주어지면 최근 N개 거래일만 남깁니다. 0은 제한 없음입니다.
    #[instrument(skip(self))]
    pub async fn get_history(&self, ticker: &str, days: Option<usize>) -> Option<Value> {
        let ticker = normalize_ticker(ticker);
        if ticker.is_empty() {
            return None;
        }

        let payload = self.chain.daily_history(&ticker).await?;
        Some(match days.filter(|d| *d > 0) {
            Some(days) => latest_days(payload.data, days),
            None => payload.data,
        })
    }

    /// Provider 응답을 정규화된 시세로 변환합니다.
    pub fn normalize(&self, ticker: &str, payload: &ProviderPayload) -> Option<PriceQuote> {
        self.chain.normalize(&normalize_ticker(ticker), payload)
    }

    async fn cached_payload(&self, key: &CacheKey) -> Option<ProviderPayload> {
        let value = match self.cache.get(key).await {
            Ok(value) => value?,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_value(value) {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!(key = %key, error = %e, "Unreadable cache entry, treating as miss");
                None
            }
        }
    }

    async fn store_payload(&self, key: &CacheKey, payload: &ProviderPayload) {
        let value = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize price payload");
                return;
            }
        };

        if let Err(e) = self.cache.set(key, &value, self.price_ttl).await {
            warn!(key = %key, error = %e, "Cache write failed");
        }
    }
}

/// 날짜 키 시계열에서 최근 `days`개 항목만 남깁니다.
///
/// 객체가 아니면 그대로 반환합니다.
fn latest_days(series: Value, days: usize) -> Value {
    match series {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| b.0.cmp(&a.0));
            entries.truncate(days);
            Value::Object(entries.into_iter().collect::<Map<String, Value>>())
        }
        other => other,
    }
}
