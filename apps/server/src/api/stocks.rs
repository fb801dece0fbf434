//! Read endpoints over the stock data provider.
//!
//! Every handler makes exactly one provider call and maps the outcome the
//! same way: absent record → 404, provider failure → 500 with a generic
//! message (the real error only goes to the log). The profile endpoint also
//! answers 400 for an empty ticker.

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use stockwise_market_data::{MarketDataError, StockData, StockProfile, StockSummary, Ticker};
use tracing::{error, warn};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// Number of entries the trending widget shows.
pub const TRENDING_LIMIT: usize = 6;

/// Edge/HTTP cache directive for the trending listing (five minutes).
pub const TRENDING_CACHE_CONTROL: &str = "public, max-age=300, s-maxage=300";

const DISCOVERY_FAILED: &str = "Failed to fetch discovery stocks";
const TRENDING_FAILED: &str = "Failed to fetch trending stocks";
const PROFILE_FAILED: &str = "Failed to fetch stock profile";
const PROFILE_NOT_FOUND: &str = "Profile not found";
const STOCK_FAILED: &str = "Failed to fetch stock data";
const STOCK_NOT_FOUND: &str = "Stock not found";

#[derive(Debug, Serialize)]
pub struct StocksResponse {
    pub stocks: Vec<StockSummary>,
}

/// Rate limits and timeouts are expected under load and only warn.
fn log_provider_failure(
    state: &AppState,
    ticker: Option<&Ticker>,
    err: &MarketDataError,
    message: &str,
) {
    let provider = state.provider.id();
    let ticker = ticker.map(Ticker::as_str);
    if err.is_transient() {
        warn!(ticker, provider, error = %err, "{}", message);
    } else {
        error!(ticker, provider, error = %err, "{}", message);
    }
}

async fn discovery_listing(
    state: &AppState,
    failure: &'static str,
) -> ApiResult<Vec<StockSummary>> {
    state.provider.fetch_discovery_stocks().await.map_err(|e| {
        log_provider_failure(state, None, &e, failure);
        ApiError::Upstream(failure.to_string())
    })
}

pub async fn get_discovery_stocks(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StocksResponse>> {
    let stocks = discovery_listing(&state, DISCOVERY_FAILED).await?;
    Ok(Json(StocksResponse { stocks }))
}

pub async fn get_trending_stocks(
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let mut stocks = discovery_listing(&state, TRENDING_FAILED).await?;
    stocks.truncate(TRENDING_LIMIT);
    Ok((
        [(header::CACHE_CONTROL, TRENDING_CACHE_CONTROL)],
        Json(StocksResponse { stocks }),
    ))
}

async fn stock_profile(state: &AppState, raw: &str) -> ApiResult<Json<StockProfile>> {
    let ticker = Ticker::parse(raw)?;
    let profile = state
        .provider
        .fetch_stock_profile(&ticker)
        .await
        .map_err(|e| {
            let message = format!("Error fetching profile for {}", ticker);
            log_provider_failure(state, Some(&ticker), &e, &message);
            ApiError::Upstream(PROFILE_FAILED.to_string())
        })?;

    match profile.filter(|p| !p.is_null()) {
        Some(profile) => Ok(Json(profile)),
        None => Err(ApiError::NotFound(PROFILE_NOT_FOUND.to_string())),
    }
}

pub async fn get_stock_profile(
    State(state): State<Arc<AppState>>,
    ticker: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<StockProfile>> {
    let Path(ticker) = ticker?;
    stock_profile(&state, &ticker).await
}

/// `/stock//profile`: the route exists only to answer with a 400.
pub async fn get_blank_ticker_profile(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StockProfile>> {
    stock_profile(&state, "").await
}

/// `/stocks/{ticker}` always carries a non-empty segment, so there is no 400
/// here: a segment that cannot name a stock is simply not found.
pub async fn get_stock_data(
    State(state): State<Arc<AppState>>,
    ticker: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<StockData>> {
    let not_found = || ApiError::NotFound(STOCK_NOT_FOUND.to_string());
    let Ok(Path(raw)) = ticker else {
        return Err(not_found());
    };
    let ticker = Ticker::parse(&raw).map_err(|_| not_found())?;
    let data = state
        .provider
        .fetch_stock_data(&ticker)
        .await
        .map_err(|e| {
            let message = format!("Error fetching stock data for {}", ticker);
            log_provider_failure(&state, Some(&ticker), &e, &message);
            ApiError::Upstream(STOCK_FAILED.to_string())
        })?;

    match data.filter(|d| !d.is_null()) {
        Some(data) => Ok(Json(data)),
        None => Err(not_found()),
    }
}
