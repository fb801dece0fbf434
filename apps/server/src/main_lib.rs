use std::sync::Arc;

use crate::{admin::AdminClient, config::Config};
use stockwise_market_data::{FinnhubProvider, StockDataProvider};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub provider: Arc<dyn StockDataProvider>,
    /// Database/auth backend client. The read endpoints never call it; readiness does.
    pub admin: Arc<AdminClient>,
    pub public_url: String,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn StockDataProvider>,
        admin: Arc<AdminClient>,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            admin,
            public_url: public_url.into(),
        }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("SW_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let mut provider = FinnhubProvider::new(config.provider.api_key.clone())
        .with_base_url(&config.provider.base_url);
    if let Some(symbols) = &config.provider.discovery_symbols {
        provider = provider.with_discovery_symbols(symbols.clone());
    }
    tracing::info!(
        provider = provider.id(),
        base_url = %config.provider.base_url,
        discovery_symbols = provider.discovery_symbols().len(),
        "Stock data provider ready"
    );

    let admin = AdminClient::new(&config.admin)?;
    tracing::info!(url = %admin.base_url(), "Admin client ready");

    Ok(Arc::new(AppState::new(
        Arc::new(provider),
        Arc::new(admin),
        config.public_url.clone(),
    )))
}
