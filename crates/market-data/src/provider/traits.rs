//! Stock data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{StockData, StockProfile, StockSummary, Ticker};

/// Trait for stock data providers.
///
/// Implement this trait to plug a new data source into the read API.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use stockwise_market_data::{StockDataProvider, StockData, StockProfile, StockSummary, Ticker};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl StockDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     async fn fetch_discovery_stocks(&self) -> Result<Vec<StockSummary>, MarketDataError> {
///         Ok(vec![])
///     }
///
///     // ... implement profile and detail lookups
/// }
/// ```
#[async_trait]
pub trait StockDataProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs.
    fn id(&self) -> &'static str;

    /// Fetch the discovery listing.
    ///
    /// An empty listing is a valid answer, not an error. Order is meaningful:
    /// callers may take a prefix of it.
    async fn fetch_discovery_stocks(&self) -> Result<Vec<StockSummary>, MarketDataError>;

    /// Fetch the company profile for a ticker.
    ///
    /// Returns `Ok(None)` when the provider has no profile for the symbol.
    async fn fetch_stock_profile(
        &self,
        ticker: &Ticker,
    ) -> Result<Option<StockProfile>, MarketDataError>;

    /// Fetch quote/detail data for a ticker.
    ///
    /// Returns `Ok(None)` when the provider has no data for the symbol.
    async fn fetch_stock_data(&self, ticker: &Ticker) -> Result<Option<StockData>, MarketDataError>;
}
