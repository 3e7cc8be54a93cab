//! 티커 해석, 시세 Provider 체인, 시세 캐싱.
//!
//! 이 crate는 다음을 제공합니다:
//! - 로컬 티커 테이블 기반 이름 해석 (정확 일치 → 유사도 매칭)
//! - Finnhub → IEX Cloud → Alpha Vantage 순서의 Provider 체인
//! - 고정 TTL 시세 캐시 (메모리 / Redis)
//! - 위 요소를 묶는 데이터 관리자

pub mod cache;
pub mod error;
pub mod manager;
pub mod provider;
pub mod resolver;

pub use error::{DataError, Result};
pub use manager::{HealthStatus, MarketDataManager};

// 캐시 타입 재내보내기
pub use cache::{CacheKey, CachePurpose, MemoryCache, PriceCache, RedisCache};

// Provider 타입 재내보내기
pub use provider::{
    AlphaVantageProvider, FinnhubProvider, IexCloudProvider, MarketDataProvider, ProviderChain,
};

// Resolver 타입 재내보내기
pub use resolver::{
    Candidate, Confirmer, MatchKind, Resolution, Resolver, ResolverThresholds,
    SqliteTickerTable, StaticTickerTable, TickerTable,
};
