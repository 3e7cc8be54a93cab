//! Alpha Vantage 시세 Provider.
//!
//! - 심볼 검색: `SYMBOL_SEARCH` → `bestMatches[0]["1. symbol"]`
//! - 시세: `TIME_SERIES_INTRADAY`(5분봉) → 가장 최근 봉
//! - 일봉 이력: `TIME_SERIES_DAILY` → `Time Series (Daily)` 객체
//!
//! 한도 초과 시에도 HTTP 200과 함께 `Note`/`Information` 필드만 내려오므로
//! 기대 필드가 없으면 데이터 없음으로 처리합니다.
//! 무료 요금제는 분당 5회로 제한됩니다.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use super::http::{endpoint, get_json};
use super::MarketDataProvider;
use crate::error::Result;
use ticker_core::{decimal_from_json, volume_from_json, PriceQuote, ProviderPayload};

const PROVIDER_NAME: &str = "ALPHA_VANTAGE";
const INTRADAY_KEY: &str = "Time Series (5min)";
const DAILY_KEY: &str = "Time Series (Daily)";

/// Alpha Vantage Provider.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageProvider {
    pub fn new(client: Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// `/query` 엔드포인트 호출.
    async fn query(&self, params: &[(&str, &str)]) -> Result<Value> {
        let url = endpoint(PROVIDER_NAME, &self.base_url, &["query"])?;
        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("apikey", self.api_key.as_str()));

        let data = get_json(&self.client, PROVIDER_NAME, url, &query).await?;
        log_api_notice(&data);
        Ok(data)
    }
}

/// 한도 초과/오류 안내 필드를 로그로 남깁니다.
fn log_api_notice(data: &Value) {
    for field in ["Note", "Information", "Error Message"] {
        if let Some(notice) = data.get(field).and_then(Value::as_str) {
            debug!(provider = PROVIDER_NAME, field, notice, "Alpha Vantage notice");
        }
    }
}

/// 시계열 객체에서 가장 최근 봉을 꺼냅니다.
///
/// 키는 `YYYY-MM-DD HH:MM:SS` 형식이므로 문자열 최댓값이 최신입니다.
fn latest_bar(series: &Value) -> Option<&Value> {
    series
        .as_object()?
        .iter()
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, bar)| bar)
}

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn search_symbol(&self, query: &str) -> Result<Option<String>> {
        let data = self
            .query(&[("function", "SYMBOL_SEARCH"), ("keywords", query)])
            .await?;

        Ok(data
            .get("bestMatches")
            .and_then(Value::as_array)
            .and_then(|matches| matches.first())
            .and_then(|first| first.get("1. symbol"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn latest_price(&self, ticker: &str) -> Result<Option<ProviderPayload>> {
        let data = self
            .query(&[
                ("function", "TIME_SERIES_INTRADAY"),
                ("symbol", ticker),
                ("interval", "5min"),
            ])
            .await?;

        Ok(data
            .get(INTRADAY_KEY)
            .and_then(latest_bar)
            .map(|bar| ProviderPayload::new(PROVIDER_NAME, bar.clone())))
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn daily_history(&self, ticker: &str) -> Result<Option<ProviderPayload>> {
        let mut data = self
            .query(&[("function", "TIME_SERIES_DAILY"), ("symbol", ticker)])
            .await?;

        Ok(data
            .get_mut(DAILY_KEY)
            .filter(|series| series.is_object())
            .map(|series| ProviderPayload::new(PROVIDER_NAME, series.take())))
    }

    fn parse_quote(&self, ticker: &str, data: &Value) -> Option<PriceQuote> {
        let field = |name: &str| data.get(name).and_then(decimal_from_json);

        let mut quote = PriceQuote::new(ticker, field("4. close")?);
        quote.open = field("1. open");
        quote.high = field("2. high");
        quote.low = field("3. low");
        quote.volume = data.get("5. volume").and_then(volume_from_json);
        Some(quote)
    }
}
