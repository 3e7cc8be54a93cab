//! Provider 체인 조회 명령어 (search, price, history).

use anyhow::{bail, Result};
use serde_json::Value;

use ticker_core::{AppConfig, PriceQuote};

use super::build_manager;

/// 회사명/키워드로 심볼을 검색합니다.
pub async fn search(config: &AppConfig, words: &[String]) -> Result<()> {
    let query = words.join(" ");
    let manager = build_manager(config).await?;

    match manager.find_ticker(&query).await {
        Some(ticker) => println!("Stock Ticker: {}", ticker),
        None => bail!("Ticker not found"),
    }
    Ok(())
}

/// 최신 시세를 출력합니다.
///
/// `raw`이면 Provider 응답을 그대로, 아니면 정규화된 요약을 출력합니다.
/// 정규화할 수 없는 응답은 원본 그대로 출력합니다.
pub async fn price(config: &AppConfig, ticker: &str, raw: bool) -> Result<()> {
    let manager = build_manager(config).await?;

    let Some(payload) = manager.get_price(ticker).await else {
        bail!("Stock price not found");
    };

    match manager.normalize(ticker, &payload).filter(|_| !raw) {
        Some(quote) => println!("{}\n  source: {}", format_quote(&quote), payload.provider),
        None => println!("{}", serde_json::to_string_pretty(&payload.data)?),
    }
    Ok(())
}

/// 일봉 이력을 출력합니다.
pub async fn history(config: &AppConfig, ticker: &str, days: Option<usize>) -> Result<()> {
    let manager = build_manager(config).await?;

    let Some(series) = manager.get_history(ticker, days).await else {
        bail!("Stock history not available");
    };

    match format_series(&series) {
        Some(table) => print!("{}", table),
        None => println!("{}", serde_json::to_string_pretty(&series)?),
    }
    Ok(())
}

/// 정규화된 시세 요약.
pub fn format_quote(quote: &PriceQuote) -> String {
    let optional = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    let mut lines = vec![format!("{}  {}", quote.ticker, quote.close)];
    lines.push(format!(
        "  open: {}  high: {}  low: {}",
        optional(quote.open.map(|v| v.to_string())),
        optional(quote.high.map(|v| v.to_string())),
        optional(quote.low.map(|v| v.to_string())),
    ));
    if let Some(range) = quote.range() {
        lines.push(format!("  range: {}", range));
    }
    if let Some(volume) = quote.volume {
        lines.push(format!("  volume: {}", volume));
    }
    if let Some(timestamp) = quote.timestamp {
        lines.push(format!("  as of: {}", timestamp.to_rfc3339()));
    }
    lines.join("\n")
}

/// 날짜 → OHLCV 객체 시계열을 최신순 표로 만듭니다.
///
/// 형태가 다르면 `None`.
pub fn format_series(series: &Value) -> Option<String> {
    const COLUMNS: [&str; 5] = ["1. open", "2. high", "3. low", "4. close", "5. volume"];

    let map = series.as_object()?;
    let mut dates: Vec<&String> = map.keys().collect();
    dates.sort_by(|a, b| b.cmp(a));

    let mut out = format!(
        "{:<12}{:>12}{:>12}{:>12}{:>12}{:>14}\n",
        "date", "open", "high", "low", "close", "volume"
    );
    for date in dates {
        let bar = map.get(date)?.as_object()?;
        let cell = |column: &str| {
            bar.get(column)
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .unwrap_or_else(|| "-".to_string())
        };
        out.push_str(&format!(
            "{:<12}{:>12}{:>12}{:>12}{:>12}{:>14}\n",
            date,
            cell(COLUMNS[0]),
            cell(COLUMNS[1]),
            cell(COLUMNS[2]),
            cell(COLUMNS[3]),
            cell(COLUMNS[4]),
        ));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_format_quote() {
        let mut quote = PriceQuote::new("AAPL", dec!(189.84));
        quote.high = Some(dec!(190.10));
        quote.volume = Some(1200);

        let text = format_quote(&quote);
        assert!(text.starts_with("AAPL  189.84"));
        assert!(text.contains("open: -  high: 190.10  low: -"));
        assert!(text.contains("volume: 1200"));
        assert!(!text.contains("as of"));
        assert!(!text.contains("range"));

        quote.low = Some(dec!(187.60));
        assert!(format_quote(&quote).contains("range: 2.50"));
    }

    #[test]
    fn test_format_series_newest_first() {
        let series = json!({
            "2024-01-04": {"1. open": "182.15", "2. high": "183.09", "3. low": "180.88", "4. close": "181.91", "5. volume": "71983570"},
            "2024-01-05": {"1. open": "181.99", "2. high": "182.76", "3. low": "180.17", "4. close": "181.18", "5. volume": "62303336"}
        });

        let table = format_series(&series).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date"));
        assert!(lines[1].starts_with("2024-01-05"));
        assert!(lines[1].contains("181.18"));
        assert!(lines[2].starts_with("2024-01-04"));
    }

    #[test]
    fn test_format_series_rejects_other_shapes() {
        assert!(format_series(&json!([1, 2, 3])).is_none());
        assert!(format_series(&json!({"2024-01-05": 181.18})).is_none());
    }
}
