use super::SiteConfigRepositoryTrait;
use crate::constants::API_KEY_MAX_LEN;
use crate::errors::{Error, Result};
use crate::settings::{SiteConfig, SiteConfigUpdate, SiteConfigView};
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn get_config(&self) -> Result<SiteConfig>;

    fn get_config_view(&self) -> Result<SiteConfigView>;

    /// Stores a new key and returns the updated view.
    async fn update_api_key(&self, update: SiteConfigUpdate) -> Result<SiteConfigView>;

    /// Stored key when set, otherwise the key from the environment.
    fn effective_api_key(&self) -> Result<Option<String>>;
}

pub struct SettingsService {
    repository: Arc<dyn SiteConfigRepositoryTrait>,
    env_api_key: Option<String>,
}

impl SettingsService {
    pub fn new(repository: Arc<dyn SiteConfigRepositoryTrait>, env_api_key: Option<String>) -> Self {
        Self {
            repository,
            env_api_key: env_api_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
        }
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_config(&self) -> Result<SiteConfig> {
        self.repository.get()
    }

    fn get_config_view(&self) -> Result<SiteConfigView> {
        Ok(self.repository.get()?.view())
    }

    async fn update_api_key(&self, update: SiteConfigUpdate) -> Result<SiteConfigView> {
        let key = update.finnhub_api_key.trim().to_string();
        if key.chars().count() > API_KEY_MAX_LEN {
            return Err(Error::field(
                "finnhub_api_key",
                format!("API key must be at most {} characters", API_KEY_MAX_LEN),
            ));
        }
        let saved = self.repository.set_api_key(key).await?;
        info!(
            "Finnhub API key {}",
            if saved.has_key() { "updated" } else { "cleared" }
        );
        Ok(saved.view())
    }

    fn effective_api_key(&self) -> Result<Option<String>> {
        let config = self.repository.get()?;
        if config.has_key() {
            return Ok(Some(config.finnhub_api_key.trim().to_string()));
        }
        Ok(self.env_api_key.clone())
    }
}
