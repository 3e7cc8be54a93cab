//! 시세 타입.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Provider가 반환한 원본 응답.
///
/// 응답 형태는 Provider마다 다르며 정규화하지 않습니다.
/// API는 `data`를 그대로 호출자에게 전달합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPayload {
    /// 응답을 만든 Provider 이름
    pub provider: String,
    /// Provider 형태 그대로의 JSON
    pub data: Value,
}

impl ProviderPayload {
    pub fn new(provider: impl Into<String>, data: Value) -> Self {
        Self {
            provider: provider.into(),
            data,
        }
    }
}

/// 정규화된 시세.
///
/// Provider 응답에서 최선의 노력으로 추출한 값이며, 표시용으로 사용됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// 티커 심볼
    pub ticker: String,
    /// 시가
    pub open: Option<Decimal>,
    /// 종가 (현재가)
    pub close: Decimal,
    /// 고가
    pub high: Option<Decimal>,
    /// 저가
    pub low: Option<Decimal>,
    /// 거래량
    pub volume: Option<u64>,
    /// 시세 시각
    pub timestamp: Option<DateTime<Utc>>,
}

impl PriceQuote {
    /// 종가만으로 시세를 생성합니다.
    pub fn new(ticker: impl Into<String>, close: Decimal) -> Self {
        Self {
            ticker: ticker.into(),
            open: None,
            close,
            high: None,
            low: None,
            volume: None,
            timestamp: None,
        }
    }

    /// 일중 등락폭 (고가 - 저가).
    pub fn range(&self) -> Option<Decimal> {
        match (self.high, self.low) {
            (Some(high), Some(low)) => Some(high - low),
            _ => None,
        }
    }
}

/// JSON 값(숫자 또는 문자열)을 Decimal로 변환합니다.
///
/// Alpha Vantage는 가격을 문자열로, Finnhub/IEX는 숫자로 내려줍니다.
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// JSON 값(숫자 또는 문자열)을 거래량으로 변환합니다.
pub fn volume_from_json(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
