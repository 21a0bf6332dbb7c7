use crate::errors::Result;
use crate::tickers::tickers_model::{NewTicker, Ticker, TickerSummary, TickerUpdate};
use async_trait::async_trait;

/// Trait for ticker repository operations
#[async_trait]
pub trait TickerRepositoryTrait: Send + Sync {
    /// All tickers ordered by symbol.
    fn list(&self) -> Result<Vec<Ticker>>;
    fn get_by_id(&self, ticker_id: i32) -> Result<Ticker>;
    fn find_by_symbol(&self, symbol: &str) -> Result<Option<Ticker>>;
    async fn create(&self, new_ticker: NewTicker) -> Result<Ticker>;
    async fn update(&self, ticker_update: TickerUpdate) -> Result<Ticker>;
    /// Deletes a ticker along with its lots.
    async fn delete(&self, ticker_id: i32) -> Result<usize>;
}

/// Trait for ticker service operations
#[async_trait]
pub trait TickerServiceTrait: Send + Sync {
    fn get_tickers(&self) -> Result<Vec<TickerSummary>>;
    fn get_ticker(&self, ticker_id: i32) -> Result<TickerSummary>;
    fn get_symbols(&self) -> Result<Vec<String>>;
    async fn create_ticker(&self, new_ticker: NewTicker) -> Result<Ticker>;
    async fn update_ticker(&self, ticker_update: TickerUpdate) -> Result<Ticker>;
    async fn delete_ticker(&self, ticker_id: i32) -> Result<()>;
}
