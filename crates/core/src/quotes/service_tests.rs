//! Tests for QuoteService refresh, fallback and search behavior.
//!
//! # Contract Points
//!
//! 1. Fresh cache entries are served without a provider call
//! 2. Live quotes are persisted with fresh or carried-over 52-week metrics
//! 3. Provider failures fall back to the last cached quote
//! 4. Provider calls never exceed `max_concurrency` in flight

#[cfg(test)]
mod tests {
    use crate::quotes::{
        CachedQuote, MarketDataClient, QuoteCacheRepositoryTrait, QuotePayload, QuoteService,
        QuoteServiceConfig, QuoteServiceTrait,
    };
    use crate::test_support::InMemoryStore;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use heatmap_market_data::{
        MarketDataError, MarketDataProvider, ProviderQuote, SearchResult, WeekRange,
    };
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // =========================================================================
    // Mock provider
    // =========================================================================

    #[derive(Default)]
    struct MockProvider {
        quotes: Mutex<HashMap<String, Result<ProviderQuote, MarketDataError>>>,
        ranges: Mutex<HashMap<String, Result<WeekRange, MarketDataError>>>,
        search_results: Mutex<Vec<SearchResult>>,
        quote_calls: AtomicUsize,
        range_calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        no_credentials: bool,
    }

    impl MockProvider {
        fn with_quote(self, symbol: &str, c: f64, pc: f64) -> Self {
            self.quotes.lock().unwrap().insert(
                symbol.to_string(),
                Ok(ProviderQuote {
                    c: Some(c),
                    pc: Some(pc),
                    h: Some(c + 1.0),
                    l: Some(c - 1.0),
                    d: Some(c - pc),
                    dp: Some((c - pc) / pc * 100.0),
                    t: Some(1_700_000_000),
                    ..ProviderQuote::default()
                }),
            );
            self
        }

        fn with_quote_error(self, symbol: &str, err: MarketDataError) -> Self {
            self.quotes
                .lock()
                .unwrap()
                .insert(symbol.to_string(), Err(err));
            self
        }

        fn with_range(self, symbol: &str, high: f64, low: f64) -> Self {
            self.ranges.lock().unwrap().insert(
                symbol.to_string(),
                Ok(WeekRange {
                    week52_high: Some(high),
                    week52_low: Some(low),
                }),
            );
            self
        }

        fn with_range_error(self, symbol: &str, err: MarketDataError) -> Self {
            self.ranges
                .lock()
                .unwrap()
                .insert(symbol.to_string(), Err(err));
            self
        }

        async fn track<T>(&self, value: T) -> T {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            value
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        fn has_credentials(&self) -> bool {
            !self.no_credentials
        }

        async fn latest_quote(&self, symbol: &str) -> Result<ProviderQuote, MarketDataError> {
            self.quote_calls.fetch_add(1, Ordering::SeqCst);
            let result = self
                .quotes
                .lock()
                .unwrap()
                .get(symbol)
                .cloned()
                .unwrap_or_else(|| Err(MarketDataError::SymbolNotFound(symbol.to_string())));
            self.track(result).await
        }

        async fn week_range(&self, symbol: &str) -> Result<WeekRange, MarketDataError> {
            self.range_calls.fetch_add(1, Ordering::SeqCst);
            let result = self
                .ranges
                .lock()
                .unwrap()
                .get(symbol)
                .cloned()
                .unwrap_or(Ok(WeekRange::default()));
            self.track(result).await
        }

        async fn search(
            &self,
            _query: &str,
            _exchange: Option<&str>,
        ) -> Result<Vec<SearchResult>, MarketDataError> {
            Ok(self.search_results.lock().unwrap().clone())
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 13, 15, 0, 0).unwrap()
    }

    fn service(
        store: &InMemoryStore,
        provider: Arc<MockProvider>,
        config: QuoteServiceConfig,
    ) -> QuoteService {
        QuoteService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(MarketDataClient::with_provider(provider)),
            config,
        )
    }

    async fn seed_cache(
        store: &InMemoryStore,
        symbol: &str,
        price: f64,
        age_secs: i64,
        metrics_as_of: Option<i64>,
    ) {
        let data = QuotePayload {
            c: Some(price),
            pc: Some(price),
            week52_high: metrics_as_of.map(|_| 200.0),
            week52_low: metrics_as_of.map(|_| 50.0),
            metrics_as_of,
            ..QuotePayload::default()
        };
        store
            .upsert(CachedQuote {
                symbol: symbol.to_string(),
                data,
                fetched_at: (now() - Duration::seconds(age_secs)).naive_utc(),
            })
            .await
            .unwrap();
    }

    fn cached(store: &InMemoryStore, symbol: &str) -> Option<CachedQuote> {
        store
            .get_many(&[symbol.to_string()])
            .unwrap()
            .into_iter()
            .next()
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    #[tokio::test]
    async fn test_live_quote_is_persisted_with_fresh_metrics() {
        let store = InMemoryStore::default();
        let provider = Arc::new(
            MockProvider::default()
                .with_quote("AAPL", 182.0, 180.0)
                .with_range("AAPL", 199.6, 164.1),
        );
        let svc = service(&store, provider.clone(), QuoteServiceConfig::default());

        let board = svc
            .refresh_quotes_at(vec![" aapl ".to_string(), "AAPL".to_string()], now())
            .await
            .unwrap();

        assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 1);
        let quote = &board.quotes["AAPL"];
        assert_eq!(quote.c, Some(182.0));
        assert_eq!(quote.week52_high, Some(199.6));
        assert_eq!(quote.metrics_as_of, Some(now().timestamp()));
        assert!(board.errors.is_empty());
        assert_eq!(board.as_of, now().timestamp());

        let saved = cached(&store, "AAPL").unwrap();
        assert_eq!(saved.data, *quote);
        assert_eq!(saved.fetched_at, now().naive_utc());
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_provider() {
        let store = InMemoryStore::default();
        seed_cache(&store, "MSFT", 410.0, 3, Some(now().timestamp() - 60)).await;
        let provider = Arc::new(MockProvider::default().with_quote("MSFT", 999.0, 990.0));
        let svc = service(&store, provider.clone(), QuoteServiceConfig::default());

        let board = svc
            .refresh_quotes_at(vec!["MSFT".to_string()], now())
            .await
            .unwrap();

        assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.range_calls.load(Ordering::SeqCst), 0);
        assert_eq!(board.quotes["MSFT"].c, Some(410.0));
    }

    #[tokio::test]
    async fn test_zero_quote_ttl_always_fetches() {
        let store = InMemoryStore::default();
        seed_cache(&store, "MSFT", 410.0, 1, Some(now().timestamp())).await;
        let provider = Arc::new(MockProvider::default().with_quote("MSFT", 412.0, 410.0));
        let config = QuoteServiceConfig {
            quote_ttl_secs: 0,
            ..QuoteServiceConfig::default()
        };
        let svc = service(&store, provider.clone(), config);

        let board = svc
            .refresh_quotes_at(vec!["MSFT".to_string()], now())
            .await
            .unwrap();

        assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 1);
        assert_eq!(board.quotes["MSFT"].c, Some(412.0));
        // Metrics were still fresh so they carry over
        assert_eq!(provider.range_calls.load(Ordering::SeqCst), 0);
        assert_eq!(board.quotes["MSFT"].week52_high, Some(200.0));
    }

    #[tokio::test]
    async fn test_fresh_cache_with_stale_metrics_updates_metrics_only() {
        let store = InMemoryStore::default();
        seed_cache(&store, "NVDA", 900.0, 2, None).await;
        let provider = Arc::new(MockProvider::default().with_range("NVDA", 974.0, 373.5));
        let svc = service(&store, provider.clone(), QuoteServiceConfig::default());

        let board = svc
            .refresh_quotes_at(vec!["NVDA".to_string()], now())
            .await
            .unwrap();

        assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 0);
        assert_eq!(board.quotes["NVDA"].week52_high, Some(974.0));
        let saved = cached(&store, "NVDA").unwrap();
        assert_eq!(saved.data.metrics_as_of, Some(now().timestamp()));
        assert_eq!(saved.fetched_at, (now() - Duration::seconds(2)).naive_utc());
    }

    #[tokio::test]
    async fn test_provider_error_serves_stale_cache() {
        let store = InMemoryStore::default();
        seed_cache(&store, "TSLA", 178.0, 3600, Some(now().timestamp())).await;
        let provider = Arc::new(MockProvider::default().with_quote_error(
            "TSLA",
            MarketDataError::RateLimited {
                provider: "MOCK".to_string(),
            },
        ));
        let svc = service(&store, provider.clone(), QuoteServiceConfig::default());

        let board = svc
            .refresh_quotes_at(vec!["TSLA".to_string()], now())
            .await
            .unwrap();

        assert_eq!(board.quotes["TSLA"].c, Some(178.0));
        assert_eq!(
            board.errors["TSLA"],
            "RATE_LIMIT: Rate limited by MOCK (using cached)"
        );
        // No metrics call for a symbol whose quote failed
        assert_eq!(provider.range_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_error_without_cache_reports_code() {
        let store = InMemoryStore::default();
        let provider = Arc::new(MockProvider::default());
        let svc = service(&store, provider, QuoteServiceConfig::default());

        let board = svc
            .refresh_quotes_at(vec!["ZZZZ".to_string()], now())
            .await
            .unwrap();

        assert!(board.quotes.is_empty());
        assert_eq!(board.errors["ZZZZ"], "NOT_FOUND: Symbol not found: ZZZZ");
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let store = InMemoryStore::default();
        let provider = Arc::new(MockProvider {
            no_credentials: true,
            ..MockProvider::default()
        });
        let svc = service(&store, provider.clone(), QuoteServiceConfig::default());

        let board = svc
            .refresh_quotes_at(vec!["AAPL".to_string()], now())
            .await
            .unwrap();

        assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 0);
        assert_eq!(board.errors["AAPL"], "NO_API_KEY: Missing Finnhub API key");
    }

    #[tokio::test]
    async fn test_metrics_error_keeps_cached_metrics() {
        let store = InMemoryStore::default();
        let stale_metrics = now().timestamp() - 30_000;
        seed_cache(&store, "JPM", 190.0, 600, Some(stale_metrics)).await;
        let provider = Arc::new(
            MockProvider::default()
                .with_quote("JPM", 195.4, 194.7)
                .with_range_error(
                    "JPM",
                    MarketDataError::Timeout {
                        provider: "MOCK".to_string(),
                    },
                ),
        );
        let svc = service(&store, provider.clone(), QuoteServiceConfig::default());

        let board = svc
            .refresh_quotes_at(vec!["JPM".to_string()], now())
            .await
            .unwrap();

        let quote = &board.quotes["JPM"];
        assert_eq!(quote.c, Some(195.4));
        assert_eq!(quote.week52_high, Some(200.0));
        assert_eq!(quote.metrics_as_of, Some(stale_metrics));
        assert_eq!(
            board.errors["JPM"],
            "TIMEOUT: Request to MOCK timed out (kept cached metrics)"
        );
    }

    #[tokio::test]
    async fn test_empty_request_uses_all_tickers() {
        let store = InMemoryStore::default();
        store.seed_ticker("AAPL", "Technology");
        store.seed_ticker("XOM", "Energy");
        let provider = Arc::new(
            MockProvider::default()
                .with_quote("AAPL", 182.0, 180.0)
                .with_quote("XOM", 120.0, 118.0),
        );
        let svc = service(&store, provider, QuoteServiceConfig::default());

        let board = svc.refresh_quotes_at(Vec::new(), now()).await.unwrap();

        let symbols: Vec<&String> = board.quotes.keys().collect();
        assert_eq!(symbols, vec!["AAPL", "XOM"]);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let store = InMemoryStore::default();
        let mut provider = MockProvider::default();
        let symbols: Vec<String> = (0..10).map(|i| format!("S{i}")).collect();
        for symbol in &symbols {
            provider = provider.with_quote(symbol, 10.0, 9.0);
        }
        let provider = Arc::new(provider);
        let config = QuoteServiceConfig {
            max_concurrency: 2,
            ..QuoteServiceConfig::default()
        };
        let svc = service(&store, provider.clone(), config);

        let board = svc.refresh_quotes_at(symbols, now()).await.unwrap();

        assert_eq!(board.quotes.len(), 10);
        assert!(provider.max_in_flight.load(Ordering::SeqCst) <= 2);
        assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 10);
    }

    // =========================================================================
    // Search
    // =========================================================================

    #[tokio::test]
    async fn test_search_empty_query_skips_provider() {
        let store = InMemoryStore::default();
        let provider = Arc::new(MockProvider::default());
        provider
            .search_results
            .lock()
            .unwrap()
            .push(SearchResult::new("AAPL", "Apple Inc", "Common Stock"));
        let svc = service(&store, provider, QuoteServiceConfig::default());

        assert!(svc.search_symbols("   ").await.unwrap().is_empty());
        assert_eq!(svc.search_symbols("app").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_is_capped() {
        let store = InMemoryStore::default();
        let provider = Arc::new(MockProvider::default());
        {
            let mut results = provider.search_results.lock().unwrap();
            for i in 0..30 {
                results.push(SearchResult::new(format!("A{i}"), "Test", "Common Stock"));
            }
        }
        let svc = service(&store, provider, QuoteServiceConfig::default());

        assert_eq!(svc.search_symbols("a").await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_profile_rejects_blank_symbol() {
        let store = InMemoryStore::default();
        let svc = service(
            &store,
            Arc::new(MockProvider::default()),
            QuoteServiceConfig::default(),
        );

        assert!(svc.get_profile("  ").await.is_err());
        let err = svc.get_profile("aapl").await.unwrap_err();
        assert!(matches!(
            err,
            crate::Error::MarketData(MarketDataError::NotSupported { .. })
        ));
    }
}
