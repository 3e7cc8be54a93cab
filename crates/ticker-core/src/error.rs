//! 티커 서비스의 핵심 에러 타입.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum TickerError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type TickerResult<T> = Result<T, TickerError>;

impl From<config::ConfigError> for TickerError {
    fn from(err: config::ConfigError) -> Self {
        TickerError::Config(err.to_string())
    }
}
