//! Market Data Client - facade over the market-data crate.
//!
//! Holds the active provider behind a lock so the API key can be swapped at
//! runtime without rebuilding the services that depend on it.
//!
//! ```text
//! QuoteService ──▶ MarketDataClient ──▶ Arc<dyn MarketDataProvider> ──▶ Finnhub
//!                        ▲
//!                        └── set_api_key() rebuilds the Finnhub provider
//! ```

use std::sync::Arc;

use log::info;
use tokio::sync::RwLock;

use heatmap_market_data::{FinnhubConfig, FinnhubProvider, MarketDataProvider};

pub struct MarketDataClient {
    provider: RwLock<Arc<dyn MarketDataProvider>>,
    /// Base Finnhub configuration used when the key changes. `None` when the
    /// client wraps a fixed provider.
    finnhub: Option<FinnhubConfig>,
}

impl MarketDataClient {
    /// Client backed by Finnhub with the given configuration.
    pub fn finnhub(config: FinnhubConfig) -> Self {
        let provider: Arc<dyn MarketDataProvider> = Arc::new(FinnhubProvider::new(config.clone()));
        Self {
            provider: RwLock::new(provider),
            finnhub: Some(config),
        }
    }

    /// Client backed by an arbitrary provider. Key updates are ignored.
    pub fn with_provider(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider: RwLock::new(provider),
            finnhub: None,
        }
    }

    /// Snapshot of the current provider.
    pub async fn provider(&self) -> Arc<dyn MarketDataProvider> {
        self.provider.read().await.clone()
    }

    /// Rebuilds the Finnhub provider with a new key.
    pub async fn set_api_key(&self, api_key: Option<String>) {
        let Some(base) = &self.finnhub else {
            return;
        };
        let config = base.clone().with_api_key(api_key);
        let has_key = config.api_key.is_some();
        let provider: Arc<dyn MarketDataProvider> = Arc::new(FinnhubProvider::new(config));
        *self.provider.write().await = provider;
        info!(
            "Market data provider reconfigured ({})",
            if has_key { "key set" } else { "no key" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_api_key_swaps_credentials() {
        let client = MarketDataClient::finnhub(FinnhubConfig::default());
        assert!(!client.provider().await.has_credentials());

        client.set_api_key(Some("abc".to_string())).await;
        assert!(client.provider().await.has_credentials());

        client.set_api_key(Some("   ".to_string())).await;
        assert!(!client.provider().await.has_credentials());
    }
}
