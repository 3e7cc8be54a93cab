//! 최신 시세 endpoint.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// 최신 시세를 Provider 응답 형태 그대로 반환합니다.
///
/// 캐시(기본 TTL 1시간)에 있으면 Provider를 호출하지 않습니다.
///
/// GET /price/{ticker}
pub async fn get_price(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<Value>> {
    let payload = state
        .manager
        .get_price(&ticker)
        .await
        .ok_or(ApiError::PriceNotFound)?;

    debug!(%ticker, provider = %payload.provider, "Price served");
    Ok(Json(payload.data))
}

/// 시세 라우터 생성.
pub fn price_router() -> Router<Arc<AppState>> {
    Router::new().route("/{ticker}", get(get_price))
}
