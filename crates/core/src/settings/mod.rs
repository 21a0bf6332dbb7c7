//! Site configuration: the provider API key and its masked view.

mod settings_model;
mod settings_service;
mod settings_traits;

pub use settings_model::{SiteConfig, SiteConfigUpdate, SiteConfigView};
pub use settings_service::{SettingsService, SettingsServiceTrait};
pub use settings_traits::SiteConfigRepositoryTrait;
