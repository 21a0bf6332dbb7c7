//! Finnhub market data provider implementation.
//!
//! This module provides market data from the Finnhub API:
//! - Real-time quotes via /quote
//! - 52-week range via /stock/metric?metric=all
//! - Symbol search via /search
//! - Company profiles via /stock/profile2
//!
//! Finnhub free tier is limited to 60 API calls per minute, so every call goes
//! through the configured [`RetryPolicy`].
//! API documentation: https://finnhub.io/docs/api

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::errors::{MarketDataError, RetryClass};
use crate::models::{CompanyProfile, ProviderQuote, SearchResult, WeekRange};
use crate::provider::MarketDataProvider;
use crate::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";
const USER_AGENT: &str = "HeatmapApp/1.0";

/// Market identifier codes treated as US listings when filtering search results.
const US_MICS: [&str; 6] = ["XNYS", "XNAS", "ARCX", "BATS", "IEXG", "FINN"];

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    c: Option<f64>,
    d: Option<f64>,
    dp: Option<f64>,
    h: Option<f64>,
    l: Option<f64>,
    pc: Option<f64>,
    t: Option<i64>,
}

/// Response from /stock/metric endpoint. Only the 52-week range is kept.
#[derive(Debug, Deserialize)]
struct MetricResponse {
    #[serde(default)]
    metric: Option<MetricBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct MetricBlock {
    #[serde(rename = "52WeekHigh")]
    week52_high: Option<f64>,
    #[serde(rename = "52WeekLow")]
    week52_low: Option<f64>,
}

/// Response from /search endpoint
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SearchItem>,
}

/// Individual search result item
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    display_symbol: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(rename = "type", default)]
    security_type: Option<String>,
    #[serde(default)]
    mic: Option<String>,
    #[serde(default)]
    primary_exchange: Option<String>,
}

/// Response from /stock/profile2 endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    name: Option<String>,
    ticker: Option<String>,
    exchange: Option<String>,
    finnhub_industry: Option<String>,
    country: Option<String>,
    currency: Option<String>,
    weburl: Option<String>,
    logo: Option<String>,
    /// Market capitalization (in millions)
    market_capitalization: Option<f64>,
}

/// Error response from Finnhub
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

// ============================================================================
// Configuration
// ============================================================================

/// Connection settings for [`FinnhubProvider`].
#[derive(Clone, Debug)]
pub struct FinnhubConfig {
    /// API token. `None` or blank means every call fails with `MissingApiKey`.
    pub api_key: Option<String>,
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for FinnhubConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

impl FinnhubConfig {
    /// Returns a copy with the given key. Blank keys are stored as `None`.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self
    }
}

// ============================================================================
// FinnhubProvider
// ============================================================================

/// Finnhub market data provider.
pub struct FinnhubProvider {
    client: Client,
    config: FinnhubConfig,
}

impl FinnhubProvider {
    /// Create a new Finnhub provider from the given configuration.
    pub fn new(config: FinnhubConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    fn api_key(&self) -> Result<&str, MarketDataError> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(MarketDataError::MissingApiKey)
    }

    /// GET with retry on transient failures.
    async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let api_key = self.api_key()?;
        let label = format!("Finnhub {}", endpoint);
        self.config
            .retry
            .run(
                &label,
                || self.fetch_once(endpoint, params, api_key),
                |e: &MarketDataError| e.retry_class() == RetryClass::WithBackoff,
            )
            .await
    }

    /// Single GET request against the Finnhub API.
    async fn fetch_once(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        api_key: &str,
    ) -> Result<String, MarketDataError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);

        debug!("Finnhub request: {} with {} params", endpoint, params.len());

        let response = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", api_key)
            .query(params)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(MarketDataError::InvalidApiKey);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status.is_server_error() {
            return Err(MarketDataError::ServerError {
                provider: PROVIDER_ID.to_string(),
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error)
                .unwrap_or(body);
            return Err(MarketDataError::HttpStatus {
                provider: PROVIDER_ID.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        response.text().await.map_err(map_transport_error)
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<ProviderQuote, MarketDataError> {
        let text = self.fetch("/quote", &[("symbol", symbol)]).await?;
        let quote = parse_quote(&text)?;
        if quote.is_empty() {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }
        Ok(quote)
    }

    async fn fetch_week_range(&self, symbol: &str) -> Result<WeekRange, MarketDataError> {
        let text = self
            .fetch("/stock/metric", &[("symbol", symbol), ("metric", "all")])
            .await?;
        parse_week_range(&text)
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, MarketDataError> {
        let text = self.fetch("/stock/profile2", &[("symbol", symbol)]).await?;

        // Finnhub answers unknown symbols with an empty object
        if text.trim() == "{}" {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }

        let response: ProfileResponse = serde_json::from_str(&text).map_err(parse_error)?;
        if response.name.is_none() && response.ticker.is_none() {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }

        Ok(CompanyProfile {
            symbol: response.ticker.unwrap_or_else(|| symbol.to_string()),
            name: response.name,
            exchange: response.exchange,
            industry: response.finnhub_industry,
            country: response.country,
            currency: response.currency,
            website: response.weburl,
            logo_url: response.logo,
            market_cap: response.market_capitalization.map(|mc| mc * 1_000_000.0),
        })
    }

    async fn search_symbols(
        &self,
        query: &str,
        exchange: Option<&str>,
    ) -> Result<Vec<SearchResult>, MarketDataError> {
        let text = self.fetch("/search", &[("q", query)]).await?;
        let results = parse_search(&text, exchange)?;
        debug!("Finnhub: found {} search results for '{}'", results.len(), query);
        Ok(results)
    }
}

#[async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn has_credentials(&self) -> bool {
        self.api_key().is_ok()
    }

    async fn latest_quote(&self, symbol: &str) -> Result<ProviderQuote, MarketDataError> {
        self.fetch_quote(symbol).await
    }

    async fn week_range(&self, symbol: &str) -> Result<WeekRange, MarketDataError> {
        self.fetch_week_range(symbol).await
    }

    async fn search(
        &self,
        query: &str,
        exchange: Option<&str>,
    ) -> Result<Vec<SearchResult>, MarketDataError> {
        self.search_symbols(query, exchange).await
    }

    async fn profile(&self, symbol: &str) -> Result<CompanyProfile, MarketDataError> {
        self.fetch_profile(symbol).await
    }
}

// ============================================================================
// Parsing helpers
// ============================================================================

fn map_transport_error(e: reqwest::Error) -> MarketDataError {
    if e.is_timeout() {
        MarketDataError::Timeout {
            provider: PROVIDER_ID.to_string(),
        }
    } else {
        MarketDataError::Network {
            provider: PROVIDER_ID.to_string(),
            message: e.to_string(),
        }
    }
}

fn parse_error(e: serde_json::Error) -> MarketDataError {
    MarketDataError::Parse {
        provider: PROVIDER_ID.to_string(),
        message: e.to_string(),
    }
}

fn parse_quote(text: &str) -> Result<ProviderQuote, MarketDataError> {
    let response: QuoteResponse = serde_json::from_str(text).map_err(parse_error)?;
    Ok(ProviderQuote {
        c: response.c,
        pc: response.pc,
        h: response.h,
        l: response.l,
        d: response.d,
        dp: response.dp,
        t: response.t,
        pre: None,
        post: None,
    })
}

fn parse_week_range(text: &str) -> Result<WeekRange, MarketDataError> {
    let response: MetricResponse = serde_json::from_str(text).map_err(parse_error)?;
    let metric = response.metric.unwrap_or_default();
    Ok(WeekRange {
        week52_high: metric.week52_high,
        week52_low: metric.week52_low,
    })
}

fn parse_search(text: &str, exchange: Option<&str>) -> Result<Vec<SearchResult>, MarketDataError> {
    let response: SearchResponse = serde_json::from_str(text).map_err(parse_error)?;
    Ok(response
        .result
        .into_iter()
        .filter(|item| is_common_stock(item) && (exchange.is_none() || is_us_listing(item, exchange)))
        .map(|item| {
            let symbol = item.symbol.or(item.display_symbol).unwrap_or_default();
            SearchResult::new(
                symbol,
                item.description.unwrap_or_default(),
                item.security_type.unwrap_or_default(),
            )
        })
        .collect())
}

fn is_common_stock(item: &SearchItem) -> bool {
    let typ = item.security_type.as_deref().unwrap_or("").to_lowercase();
    ["common", "equity", "stock"].iter().any(|k| typ.contains(k)) || typ == "e" || typ == "cs"
}

fn is_us_listing(item: &SearchItem, exchange: Option<&str>) -> bool {
    let mic = item
        .mic
        .as_deref()
        .or(item.primary_exchange.as_deref())
        .unwrap_or("")
        .to_uppercase();
    US_MICS.contains(&mic.as_str()) || exchange == Some("US")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id() {
        let provider = FinnhubProvider::new(FinnhubConfig::default());
        assert_eq!(provider.id(), "FINNHUB");
        assert!(!provider.has_credentials());
    }

    #[test]
    fn test_blank_api_key_is_dropped() {
        let config = FinnhubConfig::default().with_api_key(Some("   ".to_string()));
        assert!(config.api_key.is_none());
        let config = FinnhubConfig::default().with_api_key(Some(" abc ".to_string()));
        assert_eq!(config.api_key.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_io() {
        let provider = FinnhubProvider::new(FinnhubConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..FinnhubConfig::default()
        });
        let err = provider.latest_quote("AAPL").await.unwrap_err();
        assert_eq!(err, MarketDataError::MissingApiKey);
    }

    #[test]
    fn test_quote_response_parsing() {
        let json = r#"{"c":182.11,"d":1.89,"dp":1.0487,"h":184.5,"l":178.9,"o":180.0,"pc":180.22,"t":1700000000}"#;
        let quote = parse_quote(json).unwrap();
        assert_eq!(quote.c, Some(182.11));
        assert_eq!(quote.pc, Some(180.22));
        assert_eq!(quote.dp, Some(1.0487));
        assert_eq!(quote.t, Some(1_700_000_000));
        assert!(quote.pre.is_none() && quote.post.is_none());
        assert!(!quote.is_empty());
    }

    #[test]
    fn test_unknown_symbol_quote_is_empty() {
        let json = r#"{"c":0,"d":null,"dp":null,"h":0,"l":0,"o":0,"pc":0,"t":0}"#;
        assert!(parse_quote(json).unwrap().is_empty());
    }

    #[test]
    fn test_metric_response_parsing() {
        let json = r#"{"metric":{"52WeekHigh":199.62,"52WeekLow":124.17,"beta":1.29},"symbol":"AAPL"}"#;
        let range = parse_week_range(json).unwrap();
        assert_eq!(range.week52_high, Some(199.62));
        assert_eq!(range.week52_low, Some(124.17));

        let range = parse_week_range(r#"{"metric":{}}"#).unwrap();
        assert_eq!(range, WeekRange::default());
    }

    #[test]
    fn test_search_filters_common_stock() {
        let json = r#"{
            "count": 4,
            "result": [
                {"description":"APPLE INC","displaySymbol":"AAPL","symbol":"AAPL","type":"Common Stock"},
                {"description":"APPLE INC CALL","displaySymbol":"AAPL.C","symbol":"AAPL.C","type":"Option"},
                {"description":"ISHARES CORE","displaySymbol":"IVV","symbol":"IVV","type":"ETP"},
                {"description":"APPLE HOSPITALITY","displaySymbol":"APLE","symbol":"APLE","type":"REIT equity"}
            ]
        }"#;
        let results = parse_search(json, Some("US")).unwrap();
        let symbols: Vec<_> = results.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "APLE"]);
        assert_eq!(results[0].security_type, "Common Stock");
    }

    #[test]
    fn test_search_exchange_filter_uses_mic() {
        let json = r#"{"result":[
            {"description":"SHOPIFY","symbol":"SHOP.TO","type":"Common Stock","mic":"XTSE"},
            {"description":"SHOPIFY","symbol":"SHOP","type":"Common Stock","mic":"XNYS"}
        ]}"#;
        let results = parse_search(json, Some("XNYS")).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "SHOP");

        let all = parse_search(json, None).unwrap();
        assert_eq!(all.len(), 2);
    }
}
