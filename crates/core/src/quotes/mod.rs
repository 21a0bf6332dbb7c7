//! Quote management module.
//!
//! - [`model`] - Quote payloads, cached entries and the refresh response
//! - [`store`] - Storage trait for the last known quote per symbol
//! - [`client`] - Market data client facade for the market-data crate
//! - [`service`] - Cache-aware refresh, symbol search and company profiles
//!
//! ```text
//! QuoteService → MarketDataClient → market-data crate (Finnhub)
//!       ↓
//! QuoteCacheRepositoryTrait (DB)
//! ```

pub mod client;
pub mod model;
pub mod service;
pub mod store;

#[cfg(test)]
mod service_tests;

pub use client::MarketDataClient;
pub use model::{CachedQuote, QuoteBoard, QuotePayload, QuoteServiceConfig};
pub use service::{QuoteService, QuoteServiceTrait};
pub use store::QuoteCacheRepositoryTrait;
