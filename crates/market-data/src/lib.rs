//! Stockwise Market Data Crate
//!
//! This crate provides the provider-agnostic stock data layer consumed by the
//! Stockwise read API.
//!
//! # Overview
//!
//! ```text
//! +------------------+     +-------------------+
//! |   HTTP handler   | --> |      Ticker       |  (uppercase lookup key)
//! +------------------+     +-------------------+
//!                                  |
//!                                  v
//!                        +---------------------+
//!                        |  StockDataProvider  |  (Finnhub, test doubles)
//!                        +---------------------+
//!                                  |
//!                                  v
//!              +---------------------------------------+
//!              | StockSummary / StockProfile / StockData |  (opaque JSON)
//!              +---------------------------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Ticker`] - Normalized stock symbol
//! - [`StockSummary`] - Entry of the discovery listing
//! - [`StockProfile`] - Company profile for one ticker
//! - [`StockData`] - Quote/detail record for one ticker
//! - [`StockDataProvider`] - Trait every data source implements

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{StockData, StockProfile, StockSummary, Ticker, TickerError};
pub use provider::finnhub::FinnhubProvider;
pub use provider::StockDataProvider;
