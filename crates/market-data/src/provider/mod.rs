//! Stock data provider abstractions and implementations.
//!
//! This module contains:
//! - The `StockDataProvider` trait that all providers implement
//! - The Finnhub implementation used in production
//!
//! Providers receive tickers that are already normalized. They report a
//! symbol they do not know as `Ok(None)` and reserve `Err` for failures.

mod traits;

pub mod finnhub;

pub use traits::StockDataProvider;
