use std::{net::SocketAddr, time::Duration};

use stockwise_market_data::{provider::finnhub::DEFAULT_BASE_URL, Ticker};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Settings for the upstream stock data provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    /// `None` keeps the provider's built-in universe.
    pub discovery_symbols: Option<Vec<Ticker>>,
}

/// Settings for the database/auth backend admin client.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub url: String,
    pub secret: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub public_url: String,
    pub provider: ProviderConfig,
    pub admin: AdminConfig,
}

impl Config {
    /// Read configuration from the process environment, after loading `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing(key));

        let listen_raw = optional("SW_LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let listen_addr: SocketAddr = listen_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "SW_LISTEN_ADDR",
            value: listen_raw.clone(),
        })?;

        let cors_allow = optional("SW_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let timeout_raw = optional("SW_REQUEST_TIMEOUT_MS").unwrap_or_else(|| "30000".into());
        let timeout_ms: u64 = timeout_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "SW_REQUEST_TIMEOUT_MS",
            value: timeout_raw.clone(),
        })?;

        let public_url = optional("SW_PUBLIC_URL")
            .unwrap_or_else(|| "http://localhost:8080".into())
            .trim_end_matches('/')
            .to_string();

        let discovery_symbols = optional("SW_DISCOVERY_SYMBOLS").map(|raw| {
            raw.split(',')
                .filter_map(|s| Ticker::parse(s.trim()).ok())
                .collect::<Vec<_>>()
        });

        let provider = ProviderConfig {
            api_key: required("SW_PROVIDER_API_KEY")?,
            base_url: optional("SW_PROVIDER_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            discovery_symbols,
        };

        let admin = AdminConfig {
            url: required("SW_ADMIN_URL")?,
            secret: required("SW_ADMIN_SECRET")?,
        };

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            public_url,
            provider,
            admin,
        })
    }
}
