//! Market data models
//!
//! - `ticker` - Normalized ticker symbol used as the provider lookup key
//! - `payload` - Provider-defined records passed through to API clients

mod payload;
mod ticker;

pub use payload::{StockData, StockProfile, StockSummary};
pub use ticker::{Ticker, TickerError};
