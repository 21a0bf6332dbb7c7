use std::sync::Arc;

use crate::config::Config;
use heatmap_core::{
    advisor::AdvisorThresholds,
    dashboard::{DashboardService, DashboardServiceTrait},
    lots::{LotService, LotServiceTrait},
    quotes::{MarketDataClient, QuoteService, QuoteServiceTrait},
    sectors::{SectorService, SectorServiceTrait},
    settings::{SettingsService, SettingsServiceTrait},
    tickers::{TickerService, TickerServiceTrait},
};
use heatmap_storage_sqlite::{
    db, LotRepository, QuoteCacheRepository, SectorRepository, SiteConfigRepository,
    TickerRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub sector_service: Arc<dyn SectorServiceTrait>,
    pub ticker_service: Arc<dyn TickerServiceTrait>,
    pub lot_service: Arc<dyn LotServiceTrait>,
    pub quote_service: Arc<dyn QuoteServiceTrait>,
    pub settings_service: Arc<dyn SettingsServiceTrait>,
    pub dashboard_service: Arc<dyn DashboardServiceTrait>,
    pub db_path: String,
}

/// SQLite repositories sharing one pool and one writer.
pub struct Repositories {
    pub db_path: String,
    pub sectors: Arc<SectorRepository>,
    pub tickers: Arc<TickerRepository>,
    pub lots: Arc<LotRepository>,
    pub quotes: Arc<QuoteCacheRepository>,
    pub site_config: Arc<SiteConfigRepository>,
}

pub fn init_tracing() {
    let log_format = std::env::var("HM_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // try_init: tests build state more than once per process
    let _ = if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init()
    };
}

/// Opens the database, runs pending migrations and starts the writer.
/// Must be called from inside a Tokio runtime.
pub fn open_repositories(db_path: &str) -> anyhow::Result<Repositories> {
    let db_path = db::init(db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    Ok(Repositories {
        sectors: Arc::new(SectorRepository::new(pool.clone(), writer.clone())),
        tickers: Arc::new(TickerRepository::new(pool.clone(), writer.clone())),
        lots: Arc::new(LotRepository::new(pool.clone(), writer.clone())),
        quotes: Arc::new(QuoteCacheRepository::new(pool.clone(), writer.clone())),
        site_config: Arc::new(SiteConfigRepository::new(pool, writer)),
        db_path,
    })
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let repos = open_repositories(&config.db_path)?;

    let settings_service = Arc::new(SettingsService::new(
        repos.site_config.clone(),
        config.env_api_key.clone(),
    ));
    let api_key = settings_service.effective_api_key()?;
    if api_key.is_none() {
        tracing::warn!("No Finnhub API key configured; live quotes are disabled until one is set");
    }

    let market_data = Arc::new(MarketDataClient::finnhub(
        config.finnhub.clone().with_api_key(api_key),
    ));
    let quote_service = Arc::new(QuoteService::new(
        repos.quotes.clone(),
        repos.tickers.clone(),
        market_data,
        config.quotes.clone(),
    ));

    let sector_service = Arc::new(SectorService::new(repos.sectors.clone()));
    let ticker_service = Arc::new(TickerService::new(
        repos.tickers.clone(),
        repos.sectors.clone(),
        repos.lots.clone(),
    ));
    let lot_service = Arc::new(LotService::new(repos.lots.clone(), repos.tickers.clone()));
    let dashboard_service = Arc::new(DashboardService::new(
        sector_service.clone(),
        ticker_service.clone(),
        quote_service.clone(),
        AdvisorThresholds::default(),
    ));

    Ok(Arc::new(AppState {
        sector_service,
        ticker_service,
        lot_service,
        quote_service,
        settings_service,
        dashboard_service,
        db_path: repos.db_path,
    }))
}
