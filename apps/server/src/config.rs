use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use heatmap_core::quotes::QuoteServiceConfig;
use heatmap_market_data::{FinnhubConfig, RetryPolicy, DEFAULT_BASE_URL};

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow_origins: Vec<String>,
    pub request_timeout: Duration,
    pub static_dir: String,
    /// Key from `FINNHUB_API_KEY`. A key stored in the database takes precedence.
    pub env_api_key: Option<String>,
    pub finnhub: FinnhubConfig,
    pub quotes: QuoteServiceConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr_raw =
            std::env::var("HM_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
        let listen_addr: SocketAddr = listen_addr_raw
            .parse()
            .with_context(|| format!("Invalid HM_LISTEN_ADDR '{}'", listen_addr_raw))?;

        let db_path = std::env::var("HM_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let cors_allow_origins = std::env::var("HM_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let request_timeout = Duration::from_millis(env_number("HM_REQUEST_TIMEOUT_MS", 30_000u64));
        let static_dir = std::env::var("HM_STATIC_DIR").unwrap_or_else(|_| "dist".into());

        let env_api_key = std::env::var("FINNHUB_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let base_url = std::env::var("FINNHUB_BASE_URL")
            .ok()
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let backoff_secs = env_number("FINNHUB_BACKOFF_FACTOR", 0.75f64).max(0.0);
        let finnhub = FinnhubConfig {
            api_key: env_api_key.clone(),
            base_url,
            timeout: Duration::from_secs(env_number("FINNHUB_TIMEOUT_SECONDS", 10u64).max(1)),
            retry: RetryPolicy::new(
                env_number("FINNHUB_MAX_RETRIES", 3u32),
                Duration::from_secs_f64(backoff_secs),
            ),
        };

        let quotes = QuoteServiceConfig {
            quote_ttl_secs: env_number("FINNHUB_QUOTE_TTL_SECONDS", 10i64),
            metrics_ttl_secs: env_number("FINNHUB_METRICS_TTL_SECONDS", 21_600i64),
            max_concurrency: env_number("FINNHUB_MAX_CONCURRENCY", 4usize).max(1),
        };

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow_origins,
            request_timeout,
            static_dir,
            env_api_key,
            finnhub,
            quotes,
        })
    }
}

/// Reads a numeric env var. Missing values use the default; malformed ones
/// log a warning and use the default too.
fn env_number<T>(name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring malformed {}='{}', using {}", name, raw, default);
            default
        }),
        _ => default,
    }
}
