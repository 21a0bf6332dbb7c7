//! SQLite storage for the sector heatmap tracker.
//!
//! Implements the repository traits defined in `heatmap-core` with Diesel:
//! connection pooling, embedded migrations, a single writer actor and the
//! `XxxDB` row types. No other crate depends on Diesel.

pub mod db;
pub mod errors;
pub mod schema;

pub mod lots;
pub mod quotes;
pub mod sectors;
pub mod settings;
pub mod tickers;

pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use heatmap_core::errors::{DatabaseError, Error, Result};

pub use lots::LotRepository;
pub use quotes::QuoteCacheRepository;
pub use sectors::SectorRepository;
pub use settings::SiteConfigRepository;
pub use tickers::TickerRepository;
