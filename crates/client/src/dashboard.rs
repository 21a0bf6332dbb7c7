//! Dashboard client: render from the local cache first, then reconcile with
//! the server part by part.

use std::collections::BTreeSet;

use chrono::Utc;
use heatmap_core::advisor::{AdvisorReport, AdvisorThresholds};
use heatmap_core::dashboard::advise_board;
use heatmap_core::heatmap::{build_board, HeatmapBoard};
use heatmap_core::market_status::{compute_us_market_status, MarketStatus};
use heatmap_core::quotes::QuoteBoard;
use heatmap_core::sectors::Sector;
use heatmap_core::tickers::TickerSummary;
use heatmap_market_data::SearchResult;
use log::{info, warn};
use serde::Serialize;

use crate::cache::{CacheSnapshot, LocalCache};
use crate::errors::{ClientError, Result};
use crate::request::RequestHelper;

const API_PREFIX: &str = "/api/v1";

/// What the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub heatmap: HeatmapBoard,
    pub advice: AdvisorReport,
    /// True when at least one part came from the local cache.
    pub stale: bool,
    /// One entry per part that could not be fetched, e.g. `quotes: HTTP 502 ...`.
    pub failures: Vec<String>,
    pub saved_at: Option<i64>,
}

pub struct DashboardClient {
    http: RequestHelper,
    cache: LocalCache,
    thresholds: AdvisorThresholds,
}

impl DashboardClient {
    pub fn new(http: RequestHelper, cache: LocalCache) -> Self {
        Self {
            http,
            cache,
            thresholds: AdvisorThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: AdvisorThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// View built only from the local cache, or `None` when nothing is cached.
    pub async fn cached(&self) -> Option<DashboardView> {
        let snapshot = self.cache.load_async().await;
        if snapshot.is_empty() {
            return None;
        }
        let quotes = reconcile_quotes(
            None,
            snapshot.quotes.clone(),
            Some(snapshot.tickers.as_slice()),
        );
        Some(self.view(
            &snapshot.sectors,
            &snapshot.tickers,
            quotes,
            true,
            Vec::new(),
            snapshot.saved_at,
        ))
    }

    /// Hands the cached view to `render` right away, then refreshes.
    pub async fn load<F>(&self, render: F) -> Result<DashboardView>
    where
        F: FnOnce(&DashboardView),
    {
        if let Some(view) = self.cached().await {
            render(&view);
        }
        self.refresh().await
    }

    /// Fetches sectors, tickers and quotes.
    ///
    /// Each part that succeeds is written through to the cache. Each part that
    /// fails falls back to its cached copy and marks the view stale. Fails only
    /// when every part failed and nothing was cached.
    pub async fn refresh(&self) -> Result<DashboardView> {
        let mut snapshot = self.cache.load_async().await;
        let mut failures = Vec::new();
        let mut last_error = None;
        let mut fetched_any = false;

        match self.fetch_sectors().await {
            Ok(sectors) => {
                snapshot.sectors = sectors;
                fetched_any = true;
            }
            Err(e) => record_failure("sectors", e, &mut failures, &mut last_error),
        }

        let tickers_known = match self.fetch_tickers().await {
            Ok(tickers) => {
                snapshot.tickers = tickers;
                fetched_any = true;
                true
            }
            Err(e) => {
                record_failure("tickers", e, &mut failures, &mut last_error);
                !snapshot.tickers.is_empty()
            }
        };

        let live_quotes = match self.fetch_quotes().await {
            Ok(board) => {
                fetched_any = true;
                Some(board)
            }
            Err(e) => {
                record_failure("quotes", e, &mut failures, &mut last_error);
                None
            }
        };

        if !fetched_any && snapshot.is_empty() {
            return Err(last_error.unwrap_or_else(|| ClientError::Network("no data".to_string())));
        }

        let tracked = tickers_known.then_some(snapshot.tickers.as_slice());
        let quotes = reconcile_quotes(live_quotes, snapshot.quotes.take(), tracked);
        snapshot.quotes = Some(quotes.clone());

        if fetched_any {
            if let Err(e) = self.cache.save_async(&mut snapshot).await {
                warn!("Could not update local cache: {}", e);
            }
        }

        let stale = !failures.is_empty();
        if stale {
            info!("Dashboard refreshed with {} part(s) from cache", failures.len());
        }
        Ok(self.view(
            &snapshot.sectors,
            &snapshot.tickers,
            quotes,
            stale,
            failures,
            snapshot.saved_at,
        ))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let path = format!("{}/search?q={}", API_PREFIX, urlencoding::encode(query));
        self.http.get_json(&path).await
    }

    pub async fn market_status(&self) -> Result<MarketStatus> {
        self.http
            .get_json(&format!("{}/market-status", API_PREFIX))
            .await
    }

    async fn fetch_sectors(&self) -> Result<Vec<Sector>> {
        self.http.get_json(&format!("{}/sectors", API_PREFIX)).await
    }

    async fn fetch_tickers(&self) -> Result<Vec<TickerSummary>> {
        self.http.get_json(&format!("{}/tickers", API_PREFIX)).await
    }

    async fn fetch_quotes(&self) -> Result<QuoteBoard> {
        self.http.get_json(&format!("{}/quotes", API_PREFIX)).await
    }

    fn view(
        &self,
        sectors: &[Sector],
        tickers: &[TickerSummary],
        quotes: QuoteBoard,
        stale: bool,
        failures: Vec<String>,
        saved_at: Option<i64>,
    ) -> DashboardView {
        let heatmap = build_board(sectors, tickers, &quotes);
        let advice = advise_board(&heatmap, &self.thresholds);
        DashboardView {
            heatmap,
            advice,
            stale,
            failures,
            saved_at,
        }
    }
}

fn record_failure(
    part: &str,
    err: ClientError,
    failures: &mut Vec<String>,
    last_error: &mut Option<ClientError>,
) {
    warn!("Falling back to cached {}: {}", part, err);
    failures.push(format!("{}: {}", part, err));
    *last_error = Some(err);
}

/// Live quotes overlay cached ones per symbol; symbols that are no longer
/// tracked are dropped from both quotes and errors.
///
/// `tickers` is `None` when the ticker list is unknown, in which case nothing
/// is dropped.
pub fn reconcile_quotes(
    live: Option<QuoteBoard>,
    cached: Option<QuoteBoard>,
    tickers: Option<&[TickerSummary]>,
) -> QuoteBoard {
    let mut board = match (live, cached) {
        (Some(mut live), Some(cached)) => {
            for (symbol, quote) in cached.quotes {
                live.quotes.entry(symbol).or_insert(quote);
            }
            live
        }
        (Some(live), None) => live,
        (None, Some(cached)) => cached,
        (None, None) => {
            let now = Utc::now();
            QuoteBoard {
                as_of: now.timestamp(),
                market_status: compute_us_market_status(now),
                quotes: Default::default(),
                errors: Default::default(),
            }
        }
    };

    if let Some(tickers) = tickers {
        let tracked: BTreeSet<&str> = tickers.iter().map(|t| t.ticker.symbol.as_str()).collect();
        board.quotes.retain(|symbol, _| tracked.contains(symbol.as_str()));
        board.errors.retain(|symbol, _| tracked.contains(symbol.as_str()));
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use heatmap_core::quotes::QuotePayload;
    use heatmap_core::tickers::Ticker;
    use std::collections::BTreeMap;

    fn summary(symbol: &str) -> TickerSummary {
        TickerSummary {
            ticker: Ticker {
                id: 1,
                symbol: symbol.to_string(),
                company_name: String::new(),
                sector_id: 1,
                security_type: "Common Stock".to_string(),
                created_at: NaiveDateTime::default(),
            },
            sector_name: "Technology".to_string(),
            lots_qty: None,
            lots_cost: None,
            avg_cost: None,
        }
    }

    fn board(as_of: i64, prices: &[(&str, f64)]) -> QuoteBoard {
        QuoteBoard {
            as_of,
            market_status: compute_us_market_status(Utc::now()),
            quotes: prices
                .iter()
                .map(|(s, c)| (s.to_string(), QuotePayload::from_prices(*c, *c, *c, *c, as_of)))
                .collect::<BTreeMap<_, _>>(),
            errors: BTreeMap::new(),
        }
    }

    #[test]
    fn test_live_overlays_cached_and_untracked_are_dropped() {
        let cached = board(100, &[("AAPL", 1.0), ("MSFT", 2.0), ("OLD", 3.0)]);
        let mut live = board(200, &[("AAPL", 10.0)]);
        live.errors.insert("MSFT".to_string(), "RATE_LIMIT: slow".to_string());
        live.errors.insert("OLD".to_string(), "gone".to_string());

        let tickers = vec![summary("AAPL"), summary("MSFT")];
        let merged = reconcile_quotes(Some(live), Some(cached), Some(tickers.as_slice()));

        assert_eq!(merged.as_of, 200);
        assert_eq!(merged.quotes["AAPL"].c, Some(10.0));
        assert_eq!(merged.quotes["MSFT"].c, Some(2.0));
        assert!(!merged.quotes.contains_key("OLD"));
        assert_eq!(merged.errors.len(), 1);
    }

    #[test]
    fn test_nothing_available_gives_empty_board() {
        let merged = reconcile_quotes(None, None, Some(&[summary("AAPL")][..]));
        assert!(merged.quotes.is_empty());
        assert!(merged.as_of > 0);
    }

    #[test]
    fn test_unknown_ticker_list_keeps_every_quote() {
        let mut live = board(200, &[("AAPL", 10.0), ("XOM", 110.0)]);
        live.errors.insert("MSFT".to_string(), "RATE_LIMIT: slow".to_string());

        let merged = reconcile_quotes(Some(live.clone()), None, None);
        assert_eq!(merged, live);

        let none_tracked = reconcile_quotes(Some(live), None, Some(&[][..]));
        assert!(none_tracked.quotes.is_empty());
        assert!(none_tracked.errors.is_empty());
    }
}
