mod health;
mod robots;
mod stocks;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, error::ApiError, main_lib::AppState};

pub use robots::DISALLOWED_PATHS;
pub use stocks::{TRENDING_CACHE_CONTROL, TRENDING_LIMIT};

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any);
    }
    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(origins)
}

async fn api_not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let api = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/discovery", get(stocks::get_discovery_stocks))
        .route("/stocks/trending", get(stocks::get_trending_stocks))
        .route("/stocks/{ticker}", get(stocks::get_stock_data))
        .route("/stock/{ticker}/profile", get(stocks::get_stock_profile))
        // `{ticker}` never matches an empty segment
        .route("/stock//profile", get(stocks::get_blank_ticker_profile))
        .fallback(api_not_found);

    Router::new()
        .nest("/api", api)
        .route("/robots.txt", get(robots::robots_txt))
        .with_state(state)
        .layer(cors_layer(config))
        // Router layers wrap outward: the id is set before it is propagated
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}
