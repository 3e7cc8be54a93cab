//! IEX Cloud 시세 Provider.
//!
//! - 심볼 검색: `/stable/search/{query}` → `[0].symbol`
//! - 시세: `/stable/stock/{ticker}/quote` → `latestPrice` 필드 필요

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::instrument;

use super::http::{endpoint, get_json};
use super::MarketDataProvider;
use crate::error::Result;
use ticker_core::{decimal_from_json, volume_from_json, PriceQuote, ProviderPayload};

const PROVIDER_NAME: &str = "IEX_CLOUD";

/// IEX Cloud Provider.
pub struct IexCloudProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl IexCloudProvider {
    pub fn new(client: Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MarketDataProvider for IexCloudProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn search_symbol(&self, query: &str) -> Result<Option<String>> {
        let url = endpoint(PROVIDER_NAME, &self.base_url, &["stable", "search", query])?;
        let data = get_json(
            &self.client,
            PROVIDER_NAME,
            url,
            &[("token", self.api_key.as_str())],
        )
        .await?;

        Ok(data
            .as_array()
            .and_then(|results| results.first())
            .and_then(|first| first.get("symbol"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn latest_price(&self, ticker: &str) -> Result<Option<ProviderPayload>> {
        let url = endpoint(
            PROVIDER_NAME,
            &self.base_url,
            &["stable", "stock", ticker, "quote"],
        )?;
        let data = get_json(
            &self.client,
            PROVIDER_NAME,
            url,
            &[("token", self.api_key.as_str())],
        )
        .await?;

        if data.get("latestPrice").is_some() {
            Ok(Some(ProviderPayload::new(PROVIDER_NAME, data)))
        } else {
            Ok(None)
        }
    }

    fn parse_quote(&self, ticker: &str, data: &Value) -> Option<PriceQuote> {
        let field = |name: &str| data.get(name).and_then(decimal_from_json);

        let mut quote = PriceQuote::new(ticker, field("latestPrice")?);
        quote.open = field("open");
        quote.high = field("high");
        quote.low = field("low");
        quote.volume = data
            .get("latestVolume")
            .or_else(|| data.get("volume"))
            .and_then(volume_from_json);
        // latestUpdate는 밀리초 단위
        quote.timestamp = data
            .get("latestUpdate")
            .and_then(Value::as_i64)
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single());
        Some(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_quote() {
        let provider = IexCloudProvider::new(Client::new(), "key", "https://cloud.iexapis.com");
        let data = json!({
            "symbol": "MSFT",
            "latestPrice": 411.22,
            "open": 409.1,
            "high": 412.0,
            "low": 408.5,
            "latestVolume": 18_250_000,
            "latestUpdate": 1_700_000_000_123_i64
        });

        let quote = provider.parse_quote("MSFT", &data).unwrap();
        assert_eq!(quote.close, dec!(411.22));
        assert_eq!(quote.range(), Some(dec!(3.5)));
        assert_eq!(quote.volume, Some(18_250_000));
        assert_eq!(quote.timestamp.unwrap().timestamp_millis(), 1_700_000_000_123);
    }
}
