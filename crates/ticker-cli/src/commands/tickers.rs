//! 티커 테이블 관리 명령어 (init-db, add).

use anyhow::{Context, Result};
use tracing::info;

use ticker_core::{AppConfig, TickerRecord};

use super::open_ticker_table;

/// `tickers` 테이블을 생성합니다 (이미 있으면 유지).
pub async fn init_db(config: &AppConfig, db_url: Option<&str>) -> Result<i64> {
    let table = open_ticker_table(config, db_url).await?;
    let count = table.count().await?;
    info!(count, "Ticker table ready");
    println!("tickers table ready ({} records)", count);
    Ok(count)
}

/// 티커 레코드를 추가하거나 갱신합니다.
pub async fn add(
    config: &AppConfig,
    symbol: &str,
    name: &str,
    nickname: Option<&str>,
    db_url: Option<&str>,
) -> Result<TickerRecord> {
    let mut record = TickerRecord::new(symbol, name).context("Invalid ticker record")?;
    if let Some(nickname) = nickname {
        record = record.with_nickname(nickname);
    }

    let table = open_ticker_table(config, db_url).await?;
    table.upsert(&record).await?;

    println!("Saved {}", record);
    Ok(record)
}
