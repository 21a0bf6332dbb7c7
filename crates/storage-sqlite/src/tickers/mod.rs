//! SQLite storage implementation for tickers.

mod model;
mod repository;

pub use model::{NewTickerDB, TickerDB};
pub use repository::TickerRepository;
