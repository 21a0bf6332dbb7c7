//! Client side of the sector heatmap tracker.
//!
//! - [`RequestHelper`] talks JSON to the server with a timeout and bounded retries
//! - [`LocalCache`] mirrors the last good sectors, tickers and quotes on disk
//! - [`DashboardClient`] renders from the cache, then reconciles with the server

pub mod cache;
pub mod dashboard;
pub mod errors;
pub mod request;

pub use cache::{CacheSnapshot, LocalCache};
pub use dashboard::{reconcile_quotes, DashboardClient, DashboardView};
pub use errors::{ClientError, Result};
pub use request::{RequestHelper, DEFAULT_TIMEOUT};
