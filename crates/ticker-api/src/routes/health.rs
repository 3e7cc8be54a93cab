//! 헬스 체크 endpoint.
//!
//! 서버 상태 확인을 위한 헬스 체크 엔드포인트를 제공합니다.
//! 로드밸런서나 오케스트레이션 시스템(Kubernetes 등)에서 사용됩니다.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 전체 서비스 상태 ("healthy" | "degraded" | "unhealthy")
    pub status: String,

    /// API 버전
    pub version: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,

    /// 현재 시간 (ISO 8601)
    pub timestamp: String,

    /// 개별 컴포넌트 상태
    pub components: ComponentHealth,
}

/// 개별 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// 시세 캐시 상태
    pub cache: ComponentStatus,

    /// 외부 시세 Provider 구성
    pub providers: ComponentStatus,

    /// 로컬 티커 테이블
    pub ticker_table: ComponentStatus,
}

/// 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentStatus {
    /// 상태 ("up" | "down" | "not_configured")
    pub status: String,

    /// 추가 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    /// 비정상 상태.
    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: "down".to_string(),
            message: Some(message.into()),
        }
    }

    /// 미설정 상태.
    pub fn not_configured() -> Self {
        Self {
            status: "not_configured".to_string(),
            message: None,
        }
    }

    /// 정상 상태.
    pub fn up() -> Self {
        Self {
            status: "up".to_string(),
            message: None,
        }
    }

    /// 정보 포함 정상 상태.
    pub fn up_with_info(message: impl Into<String>) -> Self {
        Self {
            status: "up".to_string(),
            message: Some(message.into()),
        }
    }
}

/// 간단한 헬스 체크 (liveness probe용).
///
/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// 상세 헬스 체크 (readiness probe용).
///
/// 캐시나 티커 테이블이 응답하지 않으면 degraded,
/// Provider가 하나도 없으면 unhealthy입니다.
///
/// GET /health/ready
pub async fn health_ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut overall_status = "healthy";
    let mut status_code = StatusCode::OK;

    let health = state.manager.health_check().await;

    let cache_status = if health.cache {
        ComponentStatus::up_with_info(health.cache_backend)
    } else {
        overall_status = "degraded";
        ComponentStatus::down(format!("{} 연결 실패", health.cache_backend))
    };

    let providers_status = if health.providers.is_empty() {
        overall_status = "unhealthy";
        status_code = StatusCode::SERVICE_UNAVAILABLE;
        ComponentStatus::down("API 키가 설정된 Provider 없음")
    } else {
        ComponentStatus::up_with_info(health.providers.join(", "))
    };

    let ticker_table_status = match &state.resolver {
        Some(resolver) => match resolver.health_check().await {
            Ok(true) => ComponentStatus::up(),
            Ok(false) => {
                degrade(&mut overall_status);
                ComponentStatus::down("티커 테이블 응답 없음")
            }
            Err(e) => {
                degrade(&mut overall_status);
                ComponentStatus::down(e.to_string())
            }
        },
        None => ComponentStatus::not_configured(),
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        components: ComponentHealth {
            cache: cache_status,
            providers: providers_status,
            ticker_table: ticker_table_status,
        },
    };

    (status_code, Json(response))
}

fn degrade(status: &mut &'static str) {
    if *status == "healthy" {
        *status = "degraded";
    }
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(health_ready))
}
