//! Finnhub 시세 Provider.
//!
//! - 심볼 검색: `/search?q=` → `result[0].symbol`
//! - 시세: `/quote?symbol=` → `c`(현재가) 필드 필요
//!
//! 무료 요금제는 분당 60회로 제한됩니다.
//! API 문서: https://finnhub.io/docs/api

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::instrument;

use super::http::{endpoint, get_json};
use super::MarketDataProvider;
use crate::error::Result;
use ticker_core::{decimal_from_json, PriceQuote, ProviderPayload};

const PROVIDER_NAME: &str = "FINNHUB";

/// Finnhub Provider.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FinnhubProvider {
    pub fn new(client: Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn search_symbol(&self, query: &str) -> Result<Option<String>> {
        let url = endpoint(PROVIDER_NAME, &self.base_url, &["search"])?;
        let data = get_json(
            &self.client,
            PROVIDER_NAME,
            url,
            &[("q", query), ("token", self.api_key.as_str())],
        )
        .await?;

        Ok(data
            .get("result")
            .and_then(Value::as_array)
            .and_then(|results| results.first())
            .and_then(|first| first.get("symbol"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn latest_price(&self, ticker: &str) -> Result<Option<ProviderPayload>> {
        let url = endpoint(PROVIDER_NAME, &self.base_url, &["quote"])?;
        let data = get_json(
            &self.client,
            PROVIDER_NAME,
            url,
            &[("symbol", ticker), ("token", self.api_key.as_str())],
        )
        .await?;

        if data.get("c").is_some() {
            Ok(Some(ProviderPayload::new(PROVIDER_NAME, data)))
        } else {
            Ok(None)
        }
    }

    fn parse_quote(&self, ticker: &str, data: &Value) -> Option<PriceQuote> {
        let field = |name: &str| data.get(name).and_then(decimal_from_json);

        let mut quote = PriceQuote::new(ticker, field("c")?);
        quote.open = field("o");
        quote.high = field("h");
        quote.low = field("l");
        quote.timestamp = data
            .get("t")
            .and_then(Value::as_i64)
            .filter(|t| *t > 0)
            .and_then(|t| Utc.timestamp_opt(t, 0).single());
        Some(quote)
    }
}
