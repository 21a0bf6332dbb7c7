//! SQLite storage implementation for sectors.

mod model;
mod repository;

pub use model::{NewSectorDB, SectorDB};
pub use repository::SectorRepository;
