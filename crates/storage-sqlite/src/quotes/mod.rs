//! SQLite storage implementation for the quote cache.

mod model;
mod repository;

pub use model::CachedQuoteDB;
pub use repository::QuoteCacheRepository;
