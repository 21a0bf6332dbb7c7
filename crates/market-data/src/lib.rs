//! Heatmap Market Data Crate
//!
//! This crate fetches real-time quotes, 52-week ranges, symbol search results
//! and company profiles from a third-party provider.
//!
//! # Overview
//!
//! - [`MarketDataProvider`] is the provider-agnostic seam used by the services
//! - [`FinnhubProvider`] is the production implementation
//! - [`RetryPolicy`] bounds retries with exponential backoff plus jitter
//! - [`MarketDataError`] carries a stable code and a retry classification
//!
//! ```text
//! +------------------+     +------------------+     +------------------+
//! |  QuoteService    | --> | MarketDataProvider| --> |   Finnhub API    |
//! +------------------+     +------------------+     +------------------+
//!                                   |
//!                                   v
//!                           RetryPolicy (429/5xx/timeout)
//! ```

pub mod errors;
pub mod models;
pub mod provider;
pub mod retry;

pub use errors::{MarketDataError, RetryClass};
pub use models::{CompanyProfile, ProviderQuote, SearchResult, WeekRange};
pub use provider::finnhub::{FinnhubConfig, FinnhubProvider, DEFAULT_BASE_URL};
pub use provider::MarketDataProvider;
pub use retry::RetryPolicy;
