//! SQLite storage implementation for the site configuration row.

mod model;
mod repository;

pub use model::SiteConfigDB;
pub use repository::SiteConfigRepository;
