//! 티커 테이블 저장소.
//!
//! 해석기는 조회할 때마다 전체 레코드를 읽습니다. 테이블은 수백~수천 행
//! 규모를 가정하며, 인덱스나 부분 조회는 제공하지 않습니다.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::{debug, info};

use crate::error::{DataError, Result};
use ticker_core::TickerRecord;

/// 티커 레코드 공급원.
#[async_trait]
pub trait TickerTable: Send + Sync {
    /// 모든 레코드를 저장된 순서대로 반환합니다.
    async fn load_all(&self) -> Result<Vec<TickerRecord>>;

    /// 저장소 상태를 확인합니다.
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

/// 메모리 상의 고정 티커 테이블.
#[derive(Debug, Clone, Default)]
pub struct StaticTickerTable {
    records: Vec<TickerRecord>,
}

impl StaticTickerTable {
    pub fn new(records: Vec<TickerRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl TickerTable for StaticTickerTable {
    async fn load_all(&self) -> Result<Vec<TickerRecord>> {
        Ok(self.records.clone())
    }
}

#[derive(Debug, FromRow)]
struct TickerRow {
    symbol: String,
    company_name: String,
    nickname: Option<String>,
}

impl From<TickerRow> for TickerRecord {
    fn from(row: TickerRow) -> Self {
        TickerRecord {
            symbol: row.symbol,
            company_name: row.company_name,
            nickname: row.nickname,
        }
    }
}

/// SQLite `tickers` 테이블.
///
/// ```sql
/// CREATE TABLE tickers (symbol TEXT PRIMARY KEY, company_name TEXT NOT NULL, nickname TEXT)
/// ```
#[derive(Clone)]
pub struct SqliteTickerTable {
    pool: SqlitePool,
}

impl SqliteTickerTable {
    /// SQLite 데이터베이스에 연결합니다.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        info!(url, "Connecting to ticker database...");

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self { pool })
    }

    /// `tickers` 테이블이 없으면 생성합니다.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tickers (
                symbol TEXT PRIMARY KEY,
                company_name TEXT NOT NULL,
                nickname TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DataError::QueryError(e.to_string()))?;

        debug!("Ticker schema ensured");
        Ok(())
    }

    /// 레코드를 추가하거나 같은 심볼의 레코드를 갱신합니다.
    pub async fn upsert(&self, record: &TickerRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tickers (symbol, company_name, nickname)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (symbol) DO UPDATE SET
                company_name = excluded.company_name,
                nickname = excluded.nickname
            "#,
        )
        .bind(&record.symbol)
        .bind(&record.company_name)
        .bind(&record.nickname)
        .execute(&self.pool)
        .await?;

        debug!(symbol = %record.symbol, "Ticker record saved");
        Ok(())
    }

    /// 저장된 레코드 수.
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tickers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl TickerTable for SqliteTickerTable {
    async fn load_all(&self) -> Result<Vec<TickerRecord>> {
        let rows = sqlx::query_as::<_, TickerRow>(
            "SELECT symbol, company_name, nickname FROM tickers ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TickerRecord::from).collect())
    }

    async fn health_check(&self) -> Result<bool> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DataError::QueryError(e.to_string()))?;
        Ok(true)
    }
}
