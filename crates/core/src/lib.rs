//! Heatmap Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for the sector heatmap tracker:
//! sectors, tickers, purchase lots, the cached quote refresh, heatmap tiles
//! and the copilot heuristics. It is database-agnostic and defines traits
//! that are implemented by the `storage-sqlite` crate.

pub mod advisor;
pub mod constants;
pub mod dashboard;
pub mod demo;
pub mod errors;
pub mod heatmap;
pub mod lots;
pub mod market_status;
pub mod quotes;
pub mod sectors;
pub mod settings;
pub mod tickers;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
