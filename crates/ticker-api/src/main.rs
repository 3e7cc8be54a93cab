//! 티커 조회 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 티커 검색, 시세, 일봉 이력, 로컬 이름 해석, 헬스 체크 엔드포인트를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::StatusCode, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use ticker_api::routes::create_api_router;
use ticker_api::state::AppState;
use ticker_core::{init_logging, init_logging_from_env, AppConfig};
use ticker_data::{
    MarketDataManager, MemoryCache, PriceCache, RedisCache, Resolver, ResolverThresholds,
    SqliteTickerTable,
};

/// CORS 레이어 생성.
///
/// `CORS_ORIGINS`(쉼표 구분)가 있으면 해당 origin만 허용합니다.
fn cors_layer() -> CorsLayer {
    let origins: Vec<_> = std::env::var("CORS_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
        layer.allow_origin(AllowOrigin::any())
    } else {
        info!("CORS configured with {} allowed origins", origins.len());
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// 시세 캐시 생성.
///
/// Redis URL이 있으면 연결을 시도하고, 실패하면 메모리 캐시로 대체합니다.
async fn create_cache(config: &AppConfig) -> Arc<dyn PriceCache> {
    if let Some(url) = config.redis.url.as_deref() {
        let timeout = Duration::from_secs(config.redis.connection_timeout_secs);
        match RedisCache::connect(url, timeout).await {
            Ok(cache) => return Arc::new(cache),
            Err(e) => warn!(
                "Failed to connect to Redis cache: {}. Falling back to memory cache.",
                e
            ),
        }
    } else {
        info!("Redis not configured, using memory cache");
    }
    Arc::new(MemoryCache::new())
}

/// 로컬 티커 테이블 해석기 생성.
///
/// 테이블을 열 수 없으면 `/resolve`는 항상 404를 반환합니다.
async fn create_resolver(config: &AppConfig) -> Option<Resolver> {
    let table = match SqliteTickerTable::connect(
        &config.database.url,
        config.database.max_connections,
    )
    .await
    {
        Ok(table) => table,
        Err(e) => {
            warn!("Ticker table unavailable: {}. /resolve disabled.", e);
            return None;
        }
    };

    if let Err(e) = table.ensure_schema().await {
        warn!("Failed to prepare ticker table: {}. /resolve disabled.", e);
        return None;
    }

    match table.count().await {
        Ok(count) => info!(count, "Ticker table loaded"),
        Err(e) => warn!("Failed to count ticker records: {}", e),
    }

    Some(Resolver::new(
        Arc::new(table),
        ResolverThresholds::from(&config.resolver),
    ))
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    create_api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(cors_layer())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = match AppConfig::load_default() {
        Ok(config) => {
            init_logging(config.logging.to_log_config().with_env_format())
                .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;
            config
        }
        Err(e) => {
            // 설정을 읽지 못해도 에러는 남김
            init_logging_from_env()
                .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;
            error!(error = %e, "Failed to load configuration");
            return Err(e).context("failed to load configuration");
        }
    };

    info!("Starting Ticker API server...");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| {
            error!(
                host = %config.server.host,
                port = config.server.port,
                error = %e,
                "소켓 주소 설정이 유효하지 않습니다. TICKER__SERVER__HOST, TICKER__SERVER__PORT를 확인하세요."
            );
            e
        })?;

    let cache = create_cache(&config).await;
    let manager = MarketDataManager::from_config(&config, cache)
        .context("failed to build market data manager")?;

    let mut state = AppState::new(manager);
    if let Some(resolver) = create_resolver(&config).await {
        state = state.with_resolver(resolver);
    }

    info!(
        version = %state.version,
        cache = state.manager.cache_backend(),
        providers = ?state.manager.provider_names(),
        has_ticker_table = state.resolver.is_some(),
        "Application state initialized"
    );

    let app = create_router(
        Arc::new(state),
        Duration::from_secs(config.server.request_timeout_secs),
    );

    info!(%addr, "API server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
