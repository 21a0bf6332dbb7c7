//! Tickers module - domain models, services, and traits.

mod tickers_model;
mod tickers_service;
mod tickers_traits;

pub use tickers_model::{normalize_symbol, NewTicker, Ticker, TickerSummary, TickerUpdate};
pub use tickers_service::TickerService;
pub use tickers_traits::{TickerRepositoryTrait, TickerServiceTrait};
