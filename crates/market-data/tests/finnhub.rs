use std::collections::HashMap;

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use stockwise_market_data::{FinnhubProvider, MarketDataError, StockDataProvider, Ticker};

const API_KEY: &str = "test-key";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("x-finnhub-token")
        .and_then(|v| v.to_str().ok())
        == Some(API_KEY)
}

async fn quote(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match params.get("symbol").map(String::as_str) {
        Some("AAPL") => Json(json!({
            "c": 150, "d": 1.5, "dp": 1.01, "h": 151, "l": 148, "o": 149, "pc": 148.5, "t": 1700000000
        }))
        .into_response(),
        Some("MSFT") => Json(json!({
            "c": 410.25, "d": -2, "dp": -0.48, "h": 415, "l": 409, "o": 412, "pc": 412.25, "t": 1700000000
        }))
        .into_response(),
        Some("LIMIT") => StatusCode::TOO_MANY_REQUESTS.into_response(),
        Some("BOOM") => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "upstream exploded" })),
        )
            .into_response(),
        _ => Json(json!({
            "c": 0, "d": null, "dp": null, "h": 0, "l": 0, "o": 0, "pc": 0, "t": 0
        }))
        .into_response(),
    }
}

async fn profile(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match params.get("symbol").map(String::as_str) {
        Some("AAPL") => Json(json!({
            "name": "Apple Inc",
            "ticker": "AAPL",
            "country": "US",
            "finnhubIndustry": "Technology"
        }))
        .into_response(),
        _ => Json(json!({})).into_response(),
    }
}

async fn spawn_upstream() -> String {
    let router = Router::new()
        .route("/quote", get(quote))
        .route("/stock/profile2", get(profile));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn provider_with(symbols: &[&str]) -> FinnhubProvider {
    let base_url = spawn_upstream().await;
    FinnhubProvider::new(API_KEY)
        .with_base_url(base_url)
        .with_discovery_symbols(symbols.iter().map(|s| Ticker::parse(s).unwrap()).collect())
}

fn ticker(s: &str) -> Ticker {
    Ticker::parse(s).unwrap()
}

#[tokio::test]
async fn stock_data_for_known_symbol() {
    let provider = provider_with(&[]).await;
    let data = provider.fetch_stock_data(&ticker("aapl")).await.unwrap().unwrap();
    let value = data.into_inner();

    assert_eq!(value["symbol"], json!("AAPL"));
    assert_eq!(value["price"].as_f64(), Some(150.0));
    assert_eq!(value["previousClose"].as_f64(), Some(148.5));
}

#[tokio::test]
async fn stock_data_for_unknown_symbol_is_absent() {
    let provider = provider_with(&[]).await;
    let data = provider.fetch_stock_data(&ticker("ZZZZ")).await.unwrap();
    assert!(data.is_none());
}

#[tokio::test]
async fn profile_is_passed_through() {
    let provider = provider_with(&[]).await;
    let profile = provider
        .fetch_stock_profile(&ticker("AAPL"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        profile.into_inner(),
        json!({
            "name": "Apple Inc",
            "ticker": "AAPL",
            "country": "US",
            "finnhubIndustry": "Technology"
        })
    );
}

#[tokio::test]
async fn empty_profile_is_absent() {
    let provider = provider_with(&[]).await;
    let profile = provider.fetch_stock_profile(&ticker("ZZZZ")).await.unwrap();
    assert!(profile.is_none());
}

#[tokio::test]
async fn rate_limit_maps_to_rate_limited() {
    let provider = provider_with(&[]).await;
    let err = provider.fetch_stock_data(&ticker("LIMIT")).await.unwrap_err();
    assert!(matches!(err, MarketDataError::RateLimited { .. }));
}

#[tokio::test]
async fn upstream_error_message_is_kept() {
    let provider = provider_with(&[]).await;
    let err = provider.fetch_stock_data(&ticker("BOOM")).await.unwrap_err();
    match err {
        MarketDataError::ProviderError { message, .. } => assert_eq!(message, "upstream exploded"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn wrong_api_key_is_a_provider_error() {
    let base_url = spawn_upstream().await;
    let provider = FinnhubProvider::new("wrong-key").with_base_url(base_url);
    let err = provider.fetch_stock_data(&ticker("AAPL")).await.unwrap_err();
    match err {
        MarketDataError::ProviderError { message, .. } => {
            assert_eq!(message, "Invalid or missing API key")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn discovery_keeps_universe_order_and_skips_unknown() {
    let provider = provider_with(&["MSFT", "ZZZZ", "AAPL"]).await;
    let stocks = provider.fetch_discovery_stocks().await.unwrap();

    let symbols: Vec<_> = stocks
        .iter()
        .map(|s| s.0["symbol"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(symbols, vec!["MSFT", "AAPL"]);
}

#[tokio::test]
async fn discovery_skips_failing_symbols() {
    let provider = provider_with(&["AAPL", "BOOM"]).await;
    let stocks = provider.fetch_discovery_stocks().await.unwrap();
    assert_eq!(stocks.len(), 1);
}

#[tokio::test]
async fn discovery_fails_when_every_symbol_fails() {
    let provider = provider_with(&["LIMIT", "BOOM"]).await;
    assert!(provider.fetch_discovery_stocks().await.is_err());
}

#[tokio::test]
async fn discovery_with_empty_universe_is_empty() {
    let provider = provider_with(&[]).await;
    let stocks = provider.fetch_discovery_stocks().await.unwrap();
    assert!(stocks.is_empty());
}
