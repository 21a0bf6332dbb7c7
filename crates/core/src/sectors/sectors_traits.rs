use crate::errors::Result;
use crate::sectors::sectors_model::{NewSector, Sector, SectorUpdate};
use async_trait::async_trait;

/// Trait for sector repository operations
#[async_trait]
pub trait SectorRepositoryTrait: Send + Sync {
    /// All sectors ordered by name.
    fn list(&self) -> Result<Vec<Sector>>;
    fn get_by_id(&self, sector_id: i32) -> Result<Sector>;
    /// Case-insensitive lookup by name.
    fn find_by_name(&self, name: &str) -> Result<Option<Sector>>;
    async fn create(&self, new_sector: NewSector) -> Result<Sector>;
    async fn update(&self, sector_update: SectorUpdate) -> Result<Sector>;
    /// Deletes a sector along with its tickers and their lots.
    async fn delete(&self, sector_id: i32) -> Result<usize>;
}

/// Trait for sector service operations
#[async_trait]
pub trait SectorServiceTrait: Send + Sync {
    fn get_sectors(&self) -> Result<Vec<Sector>>;
    fn get_sector(&self, sector_id: i32) -> Result<Sector>;
    async fn create_sector(&self, new_sector: NewSector) -> Result<Sector>;
    async fn update_sector(&self, sector_update: SectorUpdate) -> Result<Sector>;
    async fn delete_sector(&self, sector_id: i32) -> Result<()>;
}
