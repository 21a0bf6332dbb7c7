//! Market data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{CompanyProfile, ProviderQuote, SearchResult, WeekRange};

/// Trait for market data providers.
///
/// Implement this trait to add support for a new quote source. Services in
/// `heatmap-core` only ever talk to `Arc<dyn MarketDataProvider>`, so tests can
/// swap in an in-memory provider.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use heatmap_market_data::provider::MarketDataProvider;
///
/// struct StaticProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for StaticProvider {
///     fn id(&self) -> &'static str {
///         "STATIC"
///     }
///
///     // ... implement quote methods
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "FINNHUB".
    /// Used for logging and error messages.
    fn id(&self) -> &'static str;

    /// Whether the provider has what it needs to make authenticated calls.
    fn has_credentials(&self) -> bool {
        true
    }

    /// Fetch the latest quote for a symbol.
    async fn latest_quote(&self, symbol: &str) -> Result<ProviderQuote, MarketDataError>;

    /// Fetch the 52-week high/low for a symbol.
    async fn week_range(&self, symbol: &str) -> Result<WeekRange, MarketDataError>;

    /// Search for symbols.
    ///
    /// When `exchange` is `Some("US")` only US-listed common stocks are kept.
    /// Default implementation returns `NotSupported`.
    async fn search(
        &self,
        _query: &str,
        _exchange: Option<&str>,
    ) -> Result<Vec<SearchResult>, MarketDataError> {
        Err(MarketDataError::NotSupported {
            operation: "search".to_string(),
            provider: self.id().to_string(),
        })
    }

    /// Fetch company profile information.
    ///
    /// Default implementation returns `NotSupported`.
    async fn profile(&self, _symbol: &str) -> Result<CompanyProfile, MarketDataError> {
        Err(MarketDataError::NotSupported {
            operation: "profile".to_string(),
            provider: self.id().to_string(),
        })
    }
}
