//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 데이터베이스 연결 오류
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// 쿼리 실행 오류
    #[error("Query error: {0}")]
    QueryError(String),

    /// 레코드를 찾을 수 없음
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 캐시 오류
    #[error("Cache error: {0}")]
    CacheError(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 연결 풀 소진
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// 외부 Provider 호출 오류 (네트워크, 비정상 상태 코드)
    #[error("Fetch error: {provider} - {message}")]
    FetchError { provider: String, message: String },

    /// 외부 Provider 응답 파싱 오류
    #[error("Parse error: {provider} - {message}")]
    ParseError { provider: String, message: String },
}

impl DataError {
    /// Provider 호출 오류를 생성합니다.
    pub fn fetch(provider: impl Into<String>, message: impl ToString) -> Self {
        DataError::FetchError {
            provider: provider.into(),
            message: message.to_string(),
        }
    }

    /// Provider 응답 파싱 오류를 생성합니다.
    pub fn parse(provider: impl Into<String>, message: impl ToString) -> Self {
        DataError::ParseError {
            provider: provider.into(),
            message: message.to_string(),
        }
    }
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DataError::NotFound("Row not found".to_string()),
            sqlx::Error::PoolTimedOut => DataError::PoolExhausted,
            sqlx::Error::Database(db_err) => DataError::QueryError(db_err.message().to_string()),
            _ => DataError::QueryError(err.to_string()),
        }
    }
}

impl From<redis::RedisError> for DataError {
    fn from(err: redis::RedisError) -> Self {
        DataError::CacheError(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
