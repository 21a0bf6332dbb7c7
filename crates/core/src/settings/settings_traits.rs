use crate::errors::Result;
use crate::settings::SiteConfig;
use async_trait::async_trait;

/// Trait for the single-row site configuration store.
#[async_trait]
pub trait SiteConfigRepositoryTrait: Send + Sync {
    /// Returns the stored row, or a default one if nothing was saved yet.
    fn get(&self) -> Result<SiteConfig>;
    async fn set_api_key(&self, api_key: String) -> Result<SiteConfig>;
}
