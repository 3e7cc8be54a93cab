//! 애플리케이션 공유 상태.
//!
//! 모든 핸들러는 `Arc<AppState>`를 통해 데이터 매니저와 해석기에 접근합니다.

use ticker_data::{MarketDataManager, Resolver};

/// 애플리케이션 상태.
#[derive(Clone)]
pub struct AppState {
    /// Provider 체인 + 시세 캐시
    pub manager: MarketDataManager,

    /// 로컬 티커 테이블 해석기 (테이블 미설정 시 None)
    pub resolver: Option<Resolver>,

    /// 서버 시작 시간
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(manager: MarketDataManager) -> Self {
        Self {
            manager,
            resolver: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 로컬 티커 해석기 설정.
    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}

/// 테스트용 AppState 생성.
///
/// Provider가 없는 체인과 메모리 캐시를 사용합니다.
#[cfg(test)]
pub fn create_test_state() -> AppState {
    use std::sync::Arc;
    use std::time::Duration;
    use ticker_data::{MemoryCache, ProviderChain};

    let manager = MarketDataManager::new(
        ProviderChain::new(Vec::new()),
        Arc::new(MemoryCache::new()),
        Duration::from_secs(3600),
        Duration::ZERO,
    );
    AppState::new(manager)
}
