//! API 통합 테스트.
//!
//! Provider를 mockito 서버로 대체하고 전체 라우터를 oneshot으로 호출합니다.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};
use tower::ServiceExt;

use ticker_api::{create_api_router, AppState};
use ticker_data::{
    AlphaVantageProvider, FinnhubProvider, MarketDataManager, MarketDataProvider, MemoryCache,
    ProviderChain,
};

struct TestApp {
    finnhub: ServerGuard,
    alpha_vantage: ServerGuard,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let finnhub = Server::new_async().await;
        let alpha_vantage = Server::new_async().await;

        let client = reqwest::Client::new();
        let providers: Vec<Arc<dyn MarketDataProvider>> = vec![
            Arc::new(FinnhubProvider::new(client.clone(), "fh-key", finnhub.url())),
            Arc::new(AlphaVantageProvider::new(client, "av-key", alpha_vantage.url())),
        ];
        let manager = MarketDataManager::new(
            ProviderChain::new(providers),
            Arc::new(MemoryCache::new()),
            Duration::from_secs(3600),
            Duration::ZERO,
        );

        let router = create_api_router().with_state(Arc::new(AppState::new(manager)));

        Self {
            finnhub,
            alpha_vantage,
            router,
        }
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }
}

#[tokio::test]
async fn ticker_route_returns_symbol() {
    let mut app = TestApp::new().await;
    app.finnhub
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded("q".into(), "Tesla".into()))
        .with_status(200)
        .with_body(json!({"count": 1, "result": [{"symbol": "TSLA", "description": "TESLA INC"}]}).to_string())
        .create_async()
        .await;

    let (status, json) = app.get("/ticker/Tesla").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"ticker": "TSLA"}));
}

#[tokio::test]
async fn price_route_returns_provider_shape_and_caches() {
    let mut app = TestApp::new().await;
    let quote = json!({"c": 189.84, "d": 1.2, "dp": 0.64, "h": 190.1, "l": 187.5, "o": 188.0, "pc": 188.64, "t": 1704499200});
    let finnhub = app
        .finnhub
        .mock("GET", "/quote")
        .match_query(Matcher::UrlEncoded("symbol".into(), "AAPL".into()))
        .with_status(200)
        .with_body(quote.to_string())
        .expect(1)
        .create_async()
        .await;

    let (status, first) = app.get("/price/aapl").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, quote);

    let (status, second) = app.get("/price/AAPL").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second, quote);

    finnhub.assert_async().await;
}

#[tokio::test]
async fn price_route_is_404_when_every_provider_fails() {
    let mut app = TestApp::new().await;
    app.finnhub
        .mock("GET", "/quote")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    app.alpha_vantage
        .mock("GET", "/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let (status, json) = app.get("/price/NOPE").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({"error": "Stock price not found"}));
}

#[tokio::test]
async fn history_route_limits_days() {
    let mut app = TestApp::new().await;
    app.alpha_vantage
        .mock("GET", "/query")
        .match_query(Matcher::UrlEncoded("function".into(), "TIME_SERIES_DAILY".into()))
        .with_status(200)
        .with_body(
            json!({
                "Meta Data": {"2. Symbol": "IBM"},
                "Time Series (Daily)": {
                    "2024-01-03": {"4. close": "160.10"},
                    "2024-01-04": {"4. close": "161.10"},
                    "2024-01-05": {"4. close": "159.16"}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (status, json) = app.get("/history/IBM?days=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "2024-01-04": {"4. close": "161.10"},
            "2024-01-05": {"4. close": "159.16"}
        })
    );
}

#[tokio::test]
async fn health_ready_lists_providers() {
    let app = TestApp::new().await;

    let (status, json) = app.get("/health/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["components"]["providers"]["message"], "FINNHUB, ALPHA_VANTAGE");
}
