//! 회사명 → 티커 검색 endpoint.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// 티커 검색 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct TickerResponse {
    pub ticker: String,
}

/// Provider 체인으로 회사명에 해당하는 심볼을 검색합니다.
///
/// GET /ticker/{company_name}
pub async fn get_ticker(
    State(state): State<Arc<AppState>>,
    Path(company_name): Path<String>,
) -> ApiResult<Json<TickerResponse>> {
    let ticker = state
        .manager
        .find_ticker(&company_name)
        .await
        .ok_or(ApiError::TickerNotFound)?;

    info!(%company_name, %ticker, "Ticker found");
    Ok(Json(TickerResponse { ticker }))
}

/// 티커 검색 라우터 생성.
pub fn ticker_router() -> Router<Arc<AppState>> {
    Router::new().route("/{company_name}", get(get_ticker))
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

    #[tokio::test]
    async fn test_ticker_not_found_without_providers() {
        let app = Router::new()
            .nest("/ticker", ticker_router())
            .with_state(Arc::new(create_test_state()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/ticker/Apple%20Inc")
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
        assert_eq!(json["error"], "Ticker not found");
    }
}
