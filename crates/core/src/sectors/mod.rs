//! Sectors module - domain models, services, and traits.

mod sectors_model;
mod sectors_service;
mod sectors_traits;

pub use sectors_model::{normalize_sector_name, NewSector, Sector, SectorUpdate};
pub use sectors_service::SectorService;
pub use sectors_traits::{SectorRepositoryTrait, SectorServiceTrait};
