//! 로컬 티커 테이블 이름 해석 endpoint.
//!
//! 대화식 확인이 불가능하므로 애매한 후보는 `confirmation_required`로
//! 돌려주고 최종 판단은 호출자에게 맡깁니다.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use ticker_data::{Candidate, MatchKind, Resolution};

/// 해석 응답.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResolveResponse {
    /// 확정된 심볼
    Resolved {
        ticker: String,
        #[serde(rename = "match")]
        match_kind: MatchKind,
        score: u8,
    },
    /// 사용자 확인이 필요한 후보
    NeedsConfirmation {
        confirmation_required: bool,
        candidate: Candidate,
    },
}

impl ResolveResponse {
    fn from_resolution(resolution: Resolution) -> Option<Self> {
        match resolution {
            Resolution::Exact { symbol } => Some(Self::Resolved {
                ticker: symbol,
                match_kind: MatchKind::Exact,
                score: 100,
            }),
            Resolution::Matched(candidate) => Some(Self::Resolved {
                ticker: candidate.symbol,
                match_kind: MatchKind::Fuzzy,
                score: candidate.score,
            }),
            Resolution::NeedsConfirmation(candidate) => Some(Self::NeedsConfirmation {
                confirmation_required: true,
                candidate,
            }),
            Resolution::NotFound => None,
        }
    }
}

/// 자유 입력을 로컬 티커 테이블로 해석합니다.
///
/// GET /resolve/{query}
pub async fn resolve_query(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
) -> ApiResult<Json<ResolveResponse>> {
    let resolver = state.resolver.as_ref().ok_or(ApiError::NotInDatabase)?;

    let resolution = resolver.resolve(&query).await.map_err(|e| {
        warn!(%query, error = %e, "Ticker table lookup failed");
        ApiError::NotInDatabase
    })?;

    ResolveResponse::from_resolution(resolution)
        .map(Json)
        .ok_or(ApiError::NotInDatabase)
}

/// 해석 라우터 생성.
pub fn resolve_router() -> Router<Arc<AppState>> {
    Router::new().route("/{query}", get(resolve_query))
}
