//! 시세 데이터 Provider 모듈.
//!
//! ## Provider 순서
//! 1. `FinnhubProvider`: 실시간 시세, 심볼 검색
//! 2. `IexCloudProvider`: 시세, 심볼 검색
//! 3. `AlphaVantageProvider`: 5분봉 기반 최신 시세, 심볼 검색, 일봉 이력
//!
//! `ProviderChain`이 위 순서대로 호출하며 첫 번째 성공 응답을 반환합니다.
//! 응답은 정규화하지 않고 Provider 형태 그대로 전달됩니다.

pub mod alpha_vantage;
pub mod chain;
pub mod finnhub;
mod http;
pub mod iex_cloud;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use ticker_core::{PriceQuote, ProviderPayload};

pub use alpha_vantage::AlphaVantageProvider;
pub use chain::ProviderChain;
pub use finnhub::FinnhubProvider;
pub use iex_cloud::IexCloudProvider;

/// 시세 데이터 Provider trait.
///
/// 각 메서드는 세 가지 결과를 구분합니다:
/// - `Ok(Some(..))`: 성공 응답이며 기대 필드가 있음
/// - `Ok(None)`: 응답은 정상이지만 기대 필드가 없음 (데이터 없음)
/// - `Err(..)`: 네트워크 오류, 비정상 상태 코드, 잘못된 JSON
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &'static str;

    /// 회사명/키워드로 티커 심볼을 검색합니다.
    async fn search_symbol(&self, query: &str) -> Result<Option<String>>;

    /// 최신 시세를 조회합니다.
    async fn latest_price(&self, ticker: &str) -> Result<Option<ProviderPayload>>;

    /// 일봉 이력을 조회합니다. 기본 구현은 미지원입니다.
    async fn daily_history(&self, _ticker: &str) -> Result<Option<ProviderPayload>> {
        Ok(None)
    }

    /// 이 Provider의 시세 응답을 정규화된 시세로 변환합니다.
    fn parse_quote(&self, ticker: &str, data: &Value) -> Option<PriceQuote>;
}
