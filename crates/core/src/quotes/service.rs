//! Quote Service.
//!
//! Sits between the HTTP layer and the market data provider:
//! - serves recently fetched quotes from the cache without a provider call
//! - fetches the rest concurrently, bounded by `max_concurrency`
//! - refreshes 52-week metrics only when they have aged past `metrics_ttl`
//! - falls back to the last cached quote when the provider fails

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use super::client::MarketDataClient;
use super::model::{CachedQuote, QuoteBoard, QuotePayload, QuoteServiceConfig};
use super::store::QuoteCacheRepositoryTrait;
use crate::constants::{SEARCH_EXCHANGE, SEARCH_RESULT_LIMIT};
use crate::errors::Result;
use crate::market_status::{compute_us_market_status, MarketStatus};
use crate::tickers::{normalize_symbol, TickerRepositoryTrait};
use heatmap_market_data::{
    CompanyProfile, MarketDataError, MarketDataProvider, ProviderQuote, SearchResult, WeekRange,
};

#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// Refreshes quotes for `symbols`, or for every tracked ticker when empty.
    async fn refresh_quotes(&self, symbols: Vec<String>) -> Result<QuoteBoard>;

    /// US common-stock search. An empty query returns no results.
    async fn search_symbols(&self, query: &str) -> Result<Vec<SearchResult>>;

    async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile>;

    /// Rebuilds the provider with a new key.
    async fn set_api_key(&self, api_key: Option<String>);

    fn market_status(&self) -> MarketStatus;
}

pub struct QuoteService {
    cache: Arc<dyn QuoteCacheRepositoryTrait>,
    ticker_repository: Arc<dyn TickerRepositoryTrait>,
    client: Arc<MarketDataClient>,
    config: QuoteServiceConfig,
}

impl QuoteService {
    pub fn new(
        cache: Arc<dyn QuoteCacheRepositoryTrait>,
        ticker_repository: Arc<dyn TickerRepositoryTrait>,
        client: Arc<MarketDataClient>,
        config: QuoteServiceConfig,
    ) -> Self {
        Self {
            cache,
            ticker_repository,
            client,
            config,
        }
    }

    fn concurrency(&self) -> usize {
        self.config.max_concurrency.max(1)
    }

    /// Trimmed, uppercased and deduplicated symbols in request order.
    fn normalize_symbols(&self, symbols: Vec<String>) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut normalized: Vec<String> = symbols
            .iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();

        if normalized.is_empty() {
            normalized = self
                .ticker_repository
                .list()?
                .into_iter()
                .map(|t| t.symbol)
                .collect();
        }
        Ok(normalized)
    }

    fn is_fresh(&self, cached: &CachedQuote, now: DateTime<Utc>) -> bool {
        if self.config.quote_ttl_secs <= 0 || !cached.data.has_data() {
            return false;
        }
        let age = (now.naive_utc() - cached.fetched_at).num_seconds();
        age < self.config.quote_ttl_secs
    }

    fn metrics_due(&self, cached: Option<&CachedQuote>, now_ts: i64) -> bool {
        if self.config.metrics_ttl_secs <= 0 {
            return true;
        }
        match cached.and_then(|c| c.data.metrics_as_of) {
            Some(as_of) => now_ts - as_of >= self.config.metrics_ttl_secs,
            None => true,
        }
    }

    async fn fetch_quotes(
        &self,
        provider: &Arc<dyn MarketDataProvider>,
        symbols: Vec<String>,
    ) -> HashMap<String, std::result::Result<ProviderQuote, MarketDataError>> {
        if !provider.has_credentials() {
            return symbols
                .into_iter()
                .map(|s| (s, Err(MarketDataError::MissingApiKey)))
                .collect();
        }
        stream::iter(symbols)
            .map(|symbol| {
                let provider = Arc::clone(provider);
                async move {
                    let result = provider.latest_quote(&symbol).await;
                    (symbol, result)
                }
            })
            .buffer_unordered(self.concurrency())
            .collect()
            .await
    }

    async fn fetch_metrics(
        &self,
        provider: &Arc<dyn MarketDataProvider>,
        symbols: Vec<String>,
    ) -> HashMap<String, std::result::Result<WeekRange, MarketDataError>> {
        if !provider.has_credentials() {
            return symbols
                .into_iter()
                .map(|s| (s, Err(MarketDataError::MissingApiKey)))
                .collect();
        }
        stream::iter(symbols)
            .map(|symbol| {
                let provider = Arc::clone(provider);
                async move {
                    let result = provider.week_range(&symbol).await;
                    (symbol, result)
                }
            })
            .buffer_unordered(self.concurrency())
            .collect()
            .await
    }

    async fn persist(&self, entry: CachedQuote) {
        let symbol = entry.symbol.clone();
        if let Err(e) = self.cache.upsert(entry).await {
            warn!("Failed to cache quote for {}: {}", symbol, e);
        }
    }

    /// Refresh as of `now`. Split out so tests can pin the clock.
    pub async fn refresh_quotes_at(
        &self,
        symbols: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<QuoteBoard> {
        let symbols = self.normalize_symbols(symbols)?;
        let now_ts = now.timestamp();
        let now_naive = now.naive_utc();

        let cached: HashMap<String, CachedQuote> = self
            .cache
            .get_many(&symbols)?
            .into_iter()
            .map(|c| (c.symbol.clone(), c))
            .collect();

        let (fresh, to_fetch): (Vec<String>, Vec<String>) = symbols
            .iter()
            .cloned()
            .partition(|s| cached.get(s).is_some_and(|c| self.is_fresh(c, now)));

        debug!(
            "Refreshing {} symbols ({} from cache, {} live)",
            symbols.len(),
            fresh.len(),
            to_fetch.len()
        );

        let provider = self.client.provider().await;
        let mut quote_results = self.fetch_quotes(&provider, to_fetch).await;

        let metrics_symbols: Vec<String> = symbols
            .iter()
            .filter(|s| !matches!(quote_results.get(*s), Some(Err(_))))
            .filter(|s| self.metrics_due(cached.get(*s), now_ts))
            .cloned()
            .collect();
        let mut metrics_results = self.fetch_metrics(&provider, metrics_symbols).await;

        let mut quotes = BTreeMap::new();
        let mut errors = BTreeMap::new();

        for symbol in &symbols {
            let cached_entry = cached.get(symbol);
            let metrics = metrics_results.remove(symbol);
            let metrics_error = match &metrics {
                Some(Err(e)) => Some(format!("{} (kept cached metrics)", e.display_with_code())),
                _ => None,
            };

            match quote_results.remove(symbol) {
                Some(Ok(live)) => {
                    let mut payload = QuotePayload::from(live);
                    payload = match &metrics {
                        Some(Ok(range)) => payload.with_metrics(range, now_ts),
                        _ => match cached_entry {
                            Some(c) => payload.carry_metrics_from(&c.data),
                            None => payload,
                        },
                    };
                    self.persist(CachedQuote {
                        symbol: symbol.clone(),
                        data: payload.clone(),
                        fetched_at: now_naive,
                    })
                    .await;
                    quotes.insert(symbol.clone(), payload);
                    if let Some(message) = metrics_error {
                        errors.insert(symbol.clone(), message);
                    }
                }
                Some(Err(e)) => match cached_entry {
                    Some(c) if c.data.has_data() => {
                        quotes.insert(symbol.clone(), c.data.clone());
                        errors.insert(
                            symbol.clone(),
                            format!("{} (using cached)", e.display_with_code()),
                        );
                    }
                    _ => {
                        errors.insert(symbol.clone(), e.display_with_code());
                    }
                },
                None => {
                    // Served from the short-lived cache
                    let Some(c) = cached_entry else {
                        continue;
                    };
                    let mut payload = c.data.clone();
                    if let Some(Ok(range)) = &metrics {
                        payload = payload.with_metrics(range, now_ts);
                        self.persist(CachedQuote {
                            symbol: symbol.clone(),
                            data: payload.clone(),
                            fetched_at: c.fetched_at,
                        })
                        .await;
                    }
                    quotes.insert(symbol.clone(), payload);
                    if let Some(message) = metrics_error {
                        errors.insert(symbol.clone(), message);
                    }
                }
            }
        }

        Ok(QuoteBoard {
            as_of: now_ts,
            market_status: compute_us_market_status(now),
            quotes,
            errors,
        })
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    async fn refresh_quotes(&self, symbols: Vec<String>) -> Result<QuoteBoard> {
        self.refresh_quotes_at(symbols, Utc::now()).await
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let provider = self.client.provider().await;
        let mut results = provider.search(query, Some(SEARCH_EXCHANGE)).await?;
        results.truncate(SEARCH_RESULT_LIMIT);
        Ok(results)
    }

    async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile> {
        let symbol = normalize_symbol(symbol)?;
        let provider = self.client.provider().await;
        Ok(provider.profile(&symbol).await?)
    }

    async fn set_api_key(&self, api_key: Option<String>) {
        self.client.set_api_key(api_key).await;
    }

    fn market_status(&self) -> MarketStatus {
        compute_us_market_status(Utc::now())
    }
}
