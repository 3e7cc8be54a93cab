//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/ticker/{company_name}` - Provider 체인 심볼 검색
//! - `/price/{ticker}` - 최신 시세 (캐시 사용)
//! - `/history/{ticker}` - 일봉 이력
//! - `/resolve/{query}` - 로컬 티커 테이블 이름 해석

pub mod health;
pub mod history;
pub mod price;
pub mod resolve;
pub mod ticker;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use history::{history_router, HistoryQuery};
pub use price::price_router;
pub use resolve::{resolve_router, ResolveResponse};
pub use ticker::{ticker_router, TickerResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/ticker", ticker_router())
        .nest("/price", price_router())
        .nest("/history", history_router())
        .nest("/resolve", resolve_router())
}
