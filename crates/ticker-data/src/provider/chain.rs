//! Provider 체인.
//!
//! 등록 순서대로 Provider를 호출하여 첫 번째 성공 응답을 반환합니다.
//! Provider 내 재시도, 백오프, 서킷 브레이커는 없습니다. 한 번 실패한
//! Provider는 해당 요청에서 건너뜁니다.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::http::build_client;
use super::{AlphaVantageProvider, FinnhubProvider, IexCloudProvider, MarketDataProvider};
use crate::error::{DataError, Result};
use ticker_core::{PriceQuote, ProvidersConfig, ProviderPayload};

/// 우선순위가 고정된 Provider 체인.
#[derive(Clone)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn MarketDataProvider>>,
}

impl ProviderChain {
    /// 주어진 순서 그대로 체인을 구성합니다.
    pub fn new(providers: Vec<Arc<dyn MarketDataProvider>>) -> Self {
        Self { providers }
    }

    /// 설정에서 Finnhub → IEX Cloud → Alpha Vantage 순서로 체인을 구성합니다.
    ///
    /// API 키가 없는 Provider는 제외합니다.
    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        let client = build_client(Duration::from_secs(config.timeout_secs))?;
        let mut providers: Vec<Arc<dyn MarketDataProvider>> = Vec::new();

        if config.finnhub.is_configured() {
            providers.push(Arc::new(FinnhubProvider::new(
                client.clone(),
                config.finnhub.api_key.clone(),
                config.finnhub.base_url.clone(),
            )));
        }
        if config.iex_cloud.is_configured() {
            providers.push(Arc::new(IexCloudProvider::new(
                client.clone(),
                config.iex_cloud.api_key.clone(),
                config.iex_cloud.base_url.clone(),
            )));
        }
        if config.alpha_vantage.is_configured() {
            providers.push(Arc::new(AlphaVantageProvider::new(
                client,
                config.alpha_vantage.api_key.clone(),
                config.alpha_vantage.base_url.clone(),
            )));
        }

        let chain = Self::new(providers);
        if chain.is_empty() {
            warn!("No market data provider has an API key; lookups will report not found");
        } else {
            info!(providers = ?chain.provider_names(), "Provider chain configured");
        }
        Ok(chain)
    }

    /// 등록된 Provider 이름 (호출 순서).
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// 회사명/키워드로 티커 심볼을 검색합니다.
    pub async fn search_symbol(&self, query: &str) -> Option<String> {
        for provider in &self.providers {
            match provider.search_symbol(query).await {
                Ok(Some(symbol)) => {
                    debug!(provider = provider.name(), %symbol, "Symbol found");
                    return Some(symbol);
                }
                outcome => log_miss(&**provider, "search_symbol", outcome.err()),
            }
        }
        None
    }

    /// 최신 시세를 조회합니다.
    pub async fn latest_price(&self, ticker: &str) -> Option<ProviderPayload> {
        for provider in &self.providers {
            match provider.latest_price(ticker).await {
                Ok(Some(payload)) => {
                    debug!(provider = provider.name(), ticker, "Price found");
                    return Some(payload);
                }
                outcome => log_miss(&**provider, "latest_price", outcome.err()),
            }
        }
        None
    }

    /// 일봉 이력을 조회합니다.
    pub async fn daily_history(&self, ticker: &str) -> Option<ProviderPayload> {
        for provider in &self.providers {
            match provider.daily_history(ticker).await {
                Ok(Some(payload)) => {
                    debug!(provider = provider.name(), ticker, "History found");
                    return Some(payload);
                }
                outcome => log_miss(&**provider, "daily_history", outcome.err()),
            }
        }
        None
    }

    /// 응답을 만든 Provider의 규칙으로 시세를 정규화합니다.
    pub fn normalize(&self, ticker: &str, payload: &ProviderPayload) -> Option<PriceQuote> {
        self.providers
            .iter()
            .find(|p| p.name() == payload.provider)
            .and_then(|p| p.parse_quote(ticker, &payload.data))
    }
}

fn log_miss(provider: &dyn MarketDataProvider, operation: &str, error: Option<DataError>) {
    match error {
        Some(e) => warn!(
            provider = provider.name(),
            operation,
            error = %e,
            "Provider call failed, trying next"
        ),
        None => debug!(
            provider = provider.name(),
            operation, "Provider returned no data, trying next"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticker_core::ProviderEndpoint;

    #[test]
    fn test_from_config_skips_unconfigured() {
        let mut config = ProvidersConfig::default();
        assert!(ProviderChain::from_config(&config).unwrap().is_empty());

        config.alpha_vantage.api_key = "av".to_string();
        config.finnhub.api_key = "fh".to_string();
        let chain = ProviderChain::from_config(&config).unwrap();
        assert_eq!(chain.provider_names(), vec!["FINNHUB", "ALPHA_VANTAGE"]);
    }

    #[test]
    fn test_from_config_full_order() {
        let config = ProvidersConfig {
            finnhub: ProviderEndpoint {
                api_key: "a".to_string(),
                base_url: "http://localhost:1".to_string(),
            },
            iex_cloud: ProviderEndpoint {
                api_key: "b".to_string(),
                base_url: "http://localhost:2".to_string(),
            },
            alpha_vantage: ProviderEndpoint {
                api_key: "c".to_string(),
                base_url: "http://localhost:3".to_string(),
            },
            ..Default::default()
        };
        let chain = ProviderChain::from_config(&config).unwrap();
        assert_eq!(
            chain.provider_names(),
            vec!["FINNHUB", "IEX_CLOUD", "ALPHA_VANTAGE"]
        );
    }
}
