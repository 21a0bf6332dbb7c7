//! Quote cache storage trait.

use async_trait::async_trait;

use super::model::CachedQuote;
use crate::errors::Result;

/// Storage interface for the last known quote per symbol.
#[async_trait]
pub trait QuoteCacheRepositoryTrait: Send + Sync {
    /// Cached entries for the given symbols. Unknown symbols are skipped.
    fn get_many(&self, symbols: &[String]) -> Result<Vec<CachedQuote>>;

    fn get_all(&self) -> Result<Vec<CachedQuote>>;

    /// Inserts or replaces the entry for `quote.symbol`.
    async fn upsert(&self, quote: CachedQuote) -> Result<()>;
}
