//! Provider 공용 HTTP 헬퍼.

use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{DataError, Result};

/// 타임아웃이 설정된 HTTP 클라이언트를 생성합니다.
pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DataError::ConfigError(format!("HTTP client: {}", e)))
}

/// 기본 URL 뒤에 경로 세그먼트를 붙입니다.
///
/// 각 세그먼트는 퍼센트 인코딩됩니다.
pub(crate) fn endpoint(provider: &str, base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| DataError::ConfigError(format!("{} base url: {}", provider, e)))?;
    url.path_segments_mut()
        .map_err(|_| DataError::ConfigError(format!("{} base url cannot be a base", provider)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// GET 요청을 보내고 JSON 본문을 반환합니다.
///
/// 2xx가 아니면 `FetchError`, 본문이 JSON이 아니면 `ParseError`입니다.
pub(crate) async fn get_json(
    client: &Client,
    provider: &str,
    url: Url,
    query: &[(&str, &str)],
) -> Result<Value> {
    debug!(provider, path = url.path(), "Provider request");

    let response = client
        .get(url)
        .query(query)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| DataError::fetch(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DataError::fetch(provider, format!("HTTP {}", status)));
    }

    let body = response
        .text()
        .await
        .map_err(|e| DataError::fetch(provider, e))?;

    serde_json::from_str(&body).map_err(|e| DataError::parse(provider, e))
}
