//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 설정 파일(`config/default.toml`)은 선택 사항이며, 모든 값은
//! `TICKER__` 접두사 환경 변수로 덮어쓸 수 있습니다.
//! (예: `TICKER__PROVIDERS__FINNHUB__API_KEY`)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{TickerError, TickerResult};
use crate::logging::{LogConfig, LogFormat};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 티커 테이블 데이터베이스 설정
    pub database: DatabaseConfig,
    /// Redis 설정
    pub redis: RedisConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 캐시 설정
    pub cache: CacheConfig,
    /// 이름 해석(resolver) 설정
    pub resolver: ResolverConfig,
    /// 외부 시세 Provider 설정
    pub providers: ProvidersConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 처리 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout_secs: 120,
        }
    }
}

/// 데이터베이스 설정.
///
/// 티커 레코드(심볼/회사명/별칭)를 담은 SQLite 테이블을 가리킵니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite 연결 URL
    pub url: String,
    /// 최대 연결 수
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://tickers.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

/// Redis 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis URL. 없으면 메모리 캐시를 사용합니다.
    pub url: Option<String>,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: None,
            connection_timeout_secs: 5,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// 로깅 초기화용 [`LogConfig`]로 변환합니다.
    ///
    /// 알 수 없는 형식은 pretty로 처리합니다.
    pub fn to_log_config(&self) -> LogConfig {
        let format = self.format.parse().unwrap_or(LogFormat::Pretty);
        LogConfig::new(self.level.clone()).with_format(format)
    }
}

/// 캐시 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 시세 캐시 TTL (초)
    pub price_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            price_ttl_secs: 3600,
        }
    }
}

/// 이름 해석 설정.
///
/// 유사도 점수(0~100)가 `high_threshold`를 넘으면 바로 채택하고,
/// `low_threshold`를 넘으면 사용자 확인을 요청합니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// 자동 채택 임계값
    pub high_threshold: u8,
    /// 확인 요청 임계값
    pub low_threshold: u8,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            high_threshold: 80,
            low_threshold: 60,
        }
    }
}

/// 외부 시세 Provider 설정.
///
/// Provider 조회 순서는 Finnhub → IEX Cloud → Alpha Vantage로 고정입니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// HTTP 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 심볼 검색 전 대기 시간 (밀리초)
    pub search_throttle_ms: u64,
    /// Finnhub 설정
    pub finnhub: ProviderEndpoint,
    /// IEX Cloud 설정
    pub iex_cloud: ProviderEndpoint,
    /// Alpha Vantage 설정
    pub alpha_vantage: ProviderEndpoint,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            search_throttle_ms: 1500,
            finnhub: ProviderEndpoint::new("https://finnhub.io/api/v1"),
            iex_cloud: ProviderEndpoint::new("https://cloud.iexapis.com"),
            alpha_vantage: ProviderEndpoint::new("https://www.alphavantage.co"),
        }
    }
}

/// 개별 Provider 접속 정보.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderEndpoint {
    /// API 키. 비어 있으면 해당 Provider는 체인에서 제외됩니다.
    pub api_key: String,
    /// REST API 기본 URL
    pub base_url: String,
}

impl ProviderEndpoint {
    /// 기본 URL만 지정된 접속 정보를 생성합니다.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_key: String::new(),
            base_url: base_url.into(),
        }
    }

    /// API 키가 설정되어 있는지 확인합니다.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> TickerResult<Self> {
        let builder = config::Config::builder()
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("TICKER")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> TickerResult<Self> {
        Self::load("config/default.toml")
    }

    /// 설정 값의 일관성을 검사합니다.
    pub fn validate(&self) -> TickerResult<()> {
        if self.server.port == 0 {
            return Err(TickerError::Config("server.port must be non-zero".to_string()));
        }
        if self.resolver.high_threshold > 100 {
            return Err(TickerError::Config(format!(
                "resolver.high_threshold must be <= 100, got {}",
                self.resolver.high_threshold
            )));
        }
        if self.resolver.low_threshold > self.resolver.high_threshold {
            return Err(TickerError::Config(format!(
                "resolver.low_threshold ({}) must not exceed high_threshold ({})",
                self.resolver.low_threshold, self.resolver.high_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.cache.price_ttl_secs, 3600);
        assert_eq!(config.resolver.high_threshold, 80);
        assert_eq!(config.resolver.low_threshold, 60);
        assert_eq!(config.providers.search_throttle_ms, 1500);
        assert!(config.redis.url.is_none());
        assert!(!config.providers.finnhub.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_thresholds() {
        let mut config = AppConfig::default();
        config.resolver.low_threshold = 90;
        assert!(matches!(config.validate(), Err(TickerError::Config(_))));

        config.resolver.low_threshold = 60;
        config.resolver.high_threshold = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(
            config.providers.alpha_vantage.base_url,
            "https://www.alphavantage.co"
        );
    }

    #[test]
    fn test_logging_config_conversion() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
        };
        let log_config = logging.to_log_config();
        assert_eq!(log_config.level, "debug");
        assert_eq!(log_config.format, LogFormat::Json);

        let unknown = LoggingConfig {
            level: "info".to_string(),
            format: "fancy".to_string(),
        };
        assert_eq!(unknown.to_log_config().format, LogFormat::Pretty);
    }
}
