//! 일봉 이력 endpoint.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// 이력 조회 쿼리.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// 최근 N 거래일만 반환 (0 또는 미지정 시 전체)
    pub days: Option<usize>,
}

/// 일봉 이력을 Provider 응답 형태 그대로 반환합니다.
///
/// GET /history/{ticker}?days=N
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Value>> {
    state
        .manager
        .get_history(&ticker, query.days)
        .await
        .map(Json)
        .ok_or(ApiError::HistoryNotFound)
}

/// 이력 라우터 생성.
pub fn history_router() -> Router<Arc<AppState>> {
    Router::new().route("/{ticker}", get(get_history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .nest("/history", history_router())
            .with_state(Arc::new(create_test_state()))
    }

    #[tokio::test]
    async fn test_history_not_found_without_providers() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/history/IBM?days=5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Stock history not available");
    }

    #[tokio::test]
    async fn test_invalid_days_is_rejected() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/history/IBM?days=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
