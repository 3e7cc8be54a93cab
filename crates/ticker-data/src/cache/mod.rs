//! 캐싱 레이어.
//!
//! 고정 TTL 키-값 저장소입니다. TTL 만료 외의 퇴출 정책이나
//! 용량 제한은 없으며, 동시 쓰기는 마지막 쓰기가 이깁니다.
//!
//! - 메모리 캐시: 단일 프로세스용 기본 백엔드
//! - Redis 캐시: 여러 프로세스가 공유하는 백엔드

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::error::Result;
use ticker_core::normalize_ticker;

pub use self::memory::MemoryCache;
pub use self::redis::RedisCache;

/// 캐시 항목의 용도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachePurpose {
    /// 최신 시세
    Price,
}

impl CachePurpose {
    fn as_str(&self) -> &'static str {
        match self {
            CachePurpose::Price => "price",
        }
    }
}

/// 캐시 키 (티커 + 용도).
///
/// 문자열 형태는 `{TICKER}_{purpose}` 입니다 (예: `AAPL_price`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    ticker: String,
    purpose: CachePurpose,
}

impl CacheKey {
    pub fn new(ticker: &str, purpose: CachePurpose) -> Self {
        Self {
            ticker: normalize_ticker(ticker),
            purpose,
        }
    }

    /// 시세용 캐시 키.
    pub fn price(ticker: &str) -> Self {
        Self::new(ticker, CachePurpose::Price)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.ticker, self.purpose.as_str())
    }
}

/// 시세 캐시 trait.
#[async_trait]
pub trait PriceCache: Send + Sync {
    /// 백엔드 이름 (헬스 체크 표시용).
    fn backend(&self) -> &'static str;

    /// 만료되지 않은 값을 가져옵니다. 없거나 만료되었으면 `None`.
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>>;

    /// 값을 TTL과 함께 저장합니다.
    async fn set(&self, key: &CacheKey, value: &Value, ttl: Duration) -> Result<()>;

    /// 백엔드가 응답 가능한지 확인합니다.
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
