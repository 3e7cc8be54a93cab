//! API 에러 응답 타입.
//!
//! 모든 조회 실패는 404와 `{"error": "..."}` 본문으로 응답합니다.
//! Provider 장애와 존재하지 않는 티커를 구분하지 않습니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 회사명으로 심볼을 찾지 못함
    #[error("Ticker not found")]
    TickerNotFound,

    /// 모든 Provider에서 시세 조회 실패
    #[error("Stock price not found")]
    PriceNotFound,

    /// 일봉 이력 조회 실패
    #[error("Stock history not available")]
    HistoryNotFound,

    /// 로컬 티커 테이블에서 해석 실패
    #[error("Stock not found in database")]
    NotInDatabase,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::NOT_FOUND
    }
}

/// 에러 응답 본문.
///
/// ```json
/// { "error": "Stock price not found" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::TickerNotFound.to_string(), "Ticker not found");
        assert_eq!(ApiError::PriceNotFound.to_string(), "Stock price not found");
        assert_eq!(
            ApiError::HistoryNotFound.to_string(),
            "Stock history not available"
        );
        assert_eq!(
            ApiError::NotInDatabase.to_string(),
            "Stock not found in database"
        );
    }

    #[tokio::test]
    async fn test_into_response_is_404_with_error_body() {
        let response = ApiError::PriceNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Stock price not found"}));
    }
}
