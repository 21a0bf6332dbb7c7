//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - The Finnhub implementation used in production

mod traits;

pub mod finnhub;

// Re-exports
pub use traits::MarketDataProvider;
