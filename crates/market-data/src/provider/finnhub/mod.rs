//! Finnhub stock data provider implementation.
//!
//! This module provides stock data from the Finnhub API:
//! - Quote/detail data via the /quote endpoint
//! - Company profiles via the /stock/profile2 endpoint
//! - A discovery listing built from quotes for a configured symbol universe
//!
//! Finnhub free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::future::join_all;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{StockData, StockProfile, StockSummary, Ticker};
use crate::provider::StockDataProvider;

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";

/// Symbols listed by the discovery endpoint when no universe is configured.
pub const DEFAULT_DISCOVERY_SYMBOLS: &[&str] = &[
    "AAPL", "MSFT", "NVDA", "AMZN", "GOOGL", "META", "TSLA", "AMD", "NFLX", "JPM", "V", "DIS",
];

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Change
    d: Option<f64>,
    /// Percent change
    dp: Option<f64>,
    /// High price of the day
    h: Option<f64>,
    /// Low price of the day
    l: Option<f64>,
    /// Open price of the day
    o: Option<f64>,
    /// Previous close
    pc: Option<f64>,
    /// Timestamp (Unix)
    t: Option<i64>,
}

/// Error response from Finnhub
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// Quote record handed to API clients as `StockData` and as discovery entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<Decimal>,
    pub timestamp: DateTime<Utc>,
}

impl QuoteSnapshot {
    fn to_value(&self) -> Result<Value, MarketDataError> {
        serde_json::to_value(self)
            .map_err(|e| invalid_response(format!("Failed to encode quote: {}", e)))
    }
}

fn invalid_response(message: String) -> MarketDataError {
    MarketDataError::InvalidResponse {
        provider: PROVIDER_ID.to_string(),
        message,
    }
}

fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    value.and_then(|v| Decimal::try_from(v).ok())
}

/// Decode a /quote body.
///
/// Finnhub answers unknown symbols with zeroed fields instead of an error, so
/// a quote without a current price, or with both current and open at zero,
/// means the symbol is absent.
fn parse_quote(ticker: &Ticker, text: &str) -> Result<Option<QuoteSnapshot>, MarketDataError> {
    let response: QuoteResponse = serde_json::from_str(text)
        .map_err(|e| invalid_response(format!("Failed to parse quote response: {}", e)))?;

    let close = match response.c {
        Some(c) => c,
        None => return Ok(None),
    };
    if close == 0.0 && response.o.unwrap_or(0.0) == 0.0 {
        return Ok(None);
    }

    let price = Decimal::try_from(close)
        .map_err(|_| invalid_response(format!("Invalid current price: {}", close)))?;

    let timestamp = response
        .t
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .unwrap_or_else(Utc::now);

    Ok(Some(QuoteSnapshot {
        symbol: ticker.to_string(),
        price,
        open: to_decimal(response.o),
        high: to_decimal(response.h),
        low: to_decimal(response.l),
        previous_close: to_decimal(response.pc),
        change: to_decimal(response.d),
        change_percent: to_decimal(response.dp),
        timestamp,
    }))
}

/// Decode a /stock/profile2 body.
///
/// Unknown symbols come back as `{}`. Anything with a name or ticker is passed
/// through untouched.
fn parse_profile(text: &str) -> Result<Option<Value>, MarketDataError> {
    if text.trim().is_empty() || text.trim() == "{}" {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(text)
        .map_err(|e| invalid_response(format!("Failed to parse profile response: {}", e)))?;

    let has_identity = value
        .as_object()
        .map(|obj| obj.contains_key("name") || obj.contains_key("ticker"))
        .unwrap_or(false);

    Ok(has_identity.then_some(value))
}

// ============================================================================
// FinnhubProvider
// ============================================================================

/// Finnhub stock data provider.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
    base_url: String,
    discovery_symbols: Vec<Ticker>,
}

impl FinnhubProvider {
    /// Create a new Finnhub provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        let discovery_symbols = DEFAULT_DISCOVERY_SYMBOLS
            .iter()
            .filter_map(|s| Ticker::parse(s).ok())
            .collect();

        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            discovery_symbols,
        }
    }

    /// Point the provider at another base URL (proxy, mock upstream).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the symbol universe used for discovery.
    pub fn with_discovery_symbols(mut self, symbols: Vec<Ticker>) -> Self {
        self.discovery_symbols = symbols;
        self
    }

    pub fn discovery_symbols(&self) -> &[Ticker] {
        &self.discovery_symbols
    }

    /// Make a GET request to the Finnhub API.
    async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let url = format!("{}{}", self.base_url, endpoint);

        debug!("Finnhub request: {} with {} params", endpoint, params.len());

        let response = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", &self.api_key)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::ProviderError {
                        provider: PROVIDER_ID.to_string(),
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;

        let status = response.status();

        // 403 is what Finnhub sends once the key's quota is spent
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Invalid or missing API key".to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if let Ok(ErrorResponse { error: Some(msg) }) =
                serde_json::from_str::<ErrorResponse>(&body)
            {
                return Err(MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: msg,
                });
            }

            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, body),
            });
        }

        Ok(response.text().await?)
    }

    async fn fetch_quote(&self, ticker: &Ticker) -> Result<Option<QuoteSnapshot>, MarketDataError> {
        let text = self.fetch("/quote", &[("symbol", ticker.as_str())]).await?;
        parse_quote(ticker, &text)
    }
}

// ============================================================================
// StockDataProvider Implementation
// ============================================================================

#[async_trait]
impl StockDataProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_discovery_stocks(&self) -> Result<Vec<StockSummary>, MarketDataError> {
        let results = join_all(self.discovery_symbols.iter().map(|t| self.fetch_quote(t))).await;

        let mut stocks = Vec::with_capacity(results.len());
        let mut first_error = None;
        let mut failures = 0usize;

        for (ticker, result) in self.discovery_symbols.iter().zip(results) {
            match result {
                Ok(Some(quote)) => stocks.push(StockSummary(quote.to_value()?)),
                Ok(None) => debug!("Finnhub: no quote for discovery symbol {}", ticker),
                Err(e) => {
                    warn!("Finnhub: discovery quote for {} failed: {}", ticker, e);
                    failures += 1;
                    first_error.get_or_insert(e);
                }
            }
        }

        if failures == self.discovery_symbols.len() {
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        debug!(
            "Finnhub: discovery listing has {} of {} symbols",
            stocks.len(),
            self.discovery_symbols.len()
        );

        Ok(stocks)
    }

    async fn fetch_stock_profile(
        &self,
        ticker: &Ticker,
    ) -> Result<Option<StockProfile>, MarketDataError> {
        let text = self
            .fetch("/stock/profile2", &[("symbol", ticker.as_str())])
            .await?;
        Ok(parse_profile(&text)?.map(StockProfile))
    }

    async fn fetch_stock_data(&self, ticker: &Ticker) -> Result<Option<StockData>, MarketDataError> {
        match self.fetch_quote(ticker).await? {
            Some(quote) => Ok(Some(StockData(quote.to_value()?))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn ticker(s: &str) -> Ticker {
        Ticker::parse(s).unwrap()
    }

    #[test]
    fn test_provider_id() {
        let provider = FinnhubProvider::new("test_key");
        assert_eq!(provider.id(), "FINNHUB");
    }

    #[test]
    fn test_default_discovery_universe() {
        let provider = FinnhubProvider::new("test_key");
        assert_eq!(provider.discovery_symbols().len(), DEFAULT_DISCOVERY_SYMBOLS.len());
        assert_eq!(provider.discovery_symbols()[0].as_str(), "AAPL");
    }

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let provider = FinnhubProvider::new("test_key").with_base_url("http://localhost:9000/");
        assert_eq!(provider.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_parse_quote() {
        let body = r#"{"c":150.5,"d":1.5,"dp":1.0067,"h":151,"l":148.25,"o":149,"pc":149,"t":1700000000}"#;
        let quote = parse_quote(&ticker("AAPL"), body).unwrap().unwrap();

        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, dec!(150.5));
        assert_eq!(quote.low, Some(dec!(148.25)));
        assert_eq!(quote.previous_close, Some(dec!(149)));
        assert_eq!(quote.timestamp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_quote_unknown_symbol_is_absent() {
        let body = r#"{"c":0,"d":null,"dp":null,"h":0,"l":0,"o":0,"pc":0,"t":0}"#;
        assert!(parse_quote(&ticker("ZZZZ"), body).unwrap().is_none());
    }

    #[test]
    fn test_parse_quote_missing_price_is_absent() {
        assert!(parse_quote(&ticker("ZZZZ"), "{}").unwrap().is_none());
    }

    #[test]
    fn test_parse_quote_garbage_is_error() {
        let err = parse_quote(&ticker("AAPL"), "<html>").unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidResponse { .. }));
    }

    #[test]
    fn test_quote_snapshot_json_shape() {
        let body = r#"{"c":150,"o":149,"t":1700000000}"#;
        let quote = parse_quote(&ticker("AAPL"), body).unwrap().unwrap();
        let value = quote.to_value().unwrap();

        assert_eq!(value["symbol"], json!("AAPL"));
        assert_eq!(value["price"].as_f64(), Some(150.0));
        assert!(value.get("previousClose").is_none());
        assert!(value.get("changePercent").is_none());
    }

    #[test]
    fn test_parse_profile_passes_through() {
        let body = r#"{"name":"Apple Inc","ticker":"AAPL","finnhubIndustry":"Technology"}"#;
        let profile = parse_profile(body).unwrap().unwrap();
        assert_eq!(profile["finnhubIndustry"], json!("Technology"));
    }

    #[test]
    fn test_parse_profile_empty_object_is_absent() {
        assert!(parse_profile("{}").unwrap().is_none());
        assert!(parse_profile(" { } ").unwrap().is_none());
        assert!(parse_profile(r#"{"country":"US"}"#).unwrap().is_none());
    }
}
