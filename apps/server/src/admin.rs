//! Client for the database/auth backend's service-role REST API.
//!
//! Built once at startup from [`AdminConfig`] and shared through `AppState`.

use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, StatusCode,
};
use thiserror::Error;

use crate::config::AdminConfig;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Invalid admin secret: {0}")]
    InvalidSecret(#[from] reqwest::header::InvalidHeaderValue),
    #[error("Admin request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Admin backend returned {0}")]
    Unavailable(StatusCode),
}

pub struct AdminClient {
    client: Client,
    base_url: String,
}

impl AdminClient {
    pub fn new(config: &AdminConfig) -> Result<Self, AdminError> {
        let mut api_key = HeaderValue::from_str(&config.secret)?;
        api_key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.secret))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a REST resource, e.g. `rest_url("watchlists")`.
    pub fn rest_url(&self, resource: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url,
            resource.trim_start_matches('/')
        )
    }

    /// Check that the backend answers. Any non-5xx status counts as reachable.
    pub async fn ping(&self) -> Result<(), AdminError> {
        let response = self.client.get(self.rest_url("")).send().await?;
        let status = response.status();
        if status.is_server_error() {
            return Err(AdminError::Unavailable(status));
        }
        Ok(())
    }
}
