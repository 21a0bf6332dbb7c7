//! Demo data: sectors, tickers, a few lots and cached quotes.
//!
//! Seeding is idempotent. Existing rows are reused and tickers are moved back
//! to their demo sector and company name if they drifted.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::info;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::constants::DEFAULT_SECURITY_TYPE;
use crate::errors::{Error, Result};
use crate::lots::{LotRepositoryTrait, NewPurchaseLot};
use crate::quotes::{CachedQuote, QuoteCacheRepositoryTrait, QuotePayload};
use crate::sectors::{NewSector, Sector, SectorRepositoryTrait};
use crate::tickers::{NewTicker, Ticker, TickerRepositoryTrait, TickerUpdate};

pub const DEMO_SECTORS: [&str; 10] = [
    "Technology",
    "Financials",
    "Healthcare",
    "Consumer Discretionary",
    "Energy",
    "Industrials",
    "Communication Services",
    "Utilities",
    "Materials",
    "Real Estate",
];

/// (symbol, company name, sector)
pub const DEMO_TICKERS: [(&str, &str, &str); 24] = [
    ("AAPL", "Apple Inc.", "Technology"),
    ("MSFT", "Microsoft Corporation", "Technology"),
    ("GOOGL", "Alphabet Inc. (Class A)", "Technology"),
    ("NVDA", "NVIDIA Corporation", "Technology"),
    ("META", "Meta Platforms, Inc.", "Technology"),
    ("AMZN", "Amazon.com, Inc.", "Consumer Discretionary"),
    ("TSLA", "Tesla, Inc.", "Consumer Discretionary"),
    ("JPM", "JPMorgan Chase & Co.", "Financials"),
    ("BAC", "Bank of America Corporation", "Financials"),
    ("JNJ", "Johnson & Johnson", "Healthcare"),
    ("PFE", "Pfizer Inc.", "Healthcare"),
    ("UNH", "UnitedHealth Group Incorporated", "Healthcare"),
    ("XOM", "Exxon Mobil Corporation", "Energy"),
    ("CVX", "Chevron Corporation", "Energy"),
    ("BA", "The Boeing Company", "Industrials"),
    ("CAT", "Caterpillar Inc.", "Industrials"),
    ("T", "AT&T Inc.", "Communication Services"),
    ("VZ", "Verizon Communications Inc.", "Communication Services"),
    ("NEE", "NextEra Energy, Inc.", "Utilities"),
    ("DUK", "Duke Energy Corporation", "Utilities"),
    ("LIN", "Linde plc", "Materials"),
    ("NUE", "Nucor Corporation", "Materials"),
    ("AMT", "American Tower Corporation", "Real Estate"),
    ("PLD", "Prologis, Inc.", "Real Estate"),
];

/// (symbol, quantity, price, days before today)
fn demo_lots() -> [(&'static str, Decimal, Decimal, i64); 8] {
    [
        ("AAPL", dec!(10), dec!(150), 20),
        ("AAPL", dec!(5), dec!(165), 10),
        ("MSFT", dec!(8), dec!(300), 35),
        ("AMZN", dec!(3), dec!(120), 60),
        ("AMZN", dec!(2.5), dec!(130), 15),
        ("TSLA", dec!(1.2), dec!(700), 200),
        ("JPM", dec!(20), dec!(120), 90),
        ("XOM", dec!(15), dec!(105), 25),
    ]
}

/// (symbol, current, previous close, high, low)
pub const DEMO_QUOTES: [(&str, f64, f64, f64, f64); 10] = [
    ("AAPL", 182.11, 180.22, 184.50, 178.90),
    ("MSFT", 412.33, 410.10, 415.20, 405.80),
    ("GOOGL", 142.05, 143.20, 144.00, 140.10),
    ("NVDA", 912.88, 900.00, 930.00, 888.00),
    ("META", 505.12, 500.00, 510.00, 492.00),
    ("AMZN", 176.45, 175.80, 178.50, 172.20),
    ("TSLA", 178.20, 182.00, 185.00, 175.00),
    ("JPM", 195.40, 194.70, 197.00, 192.50),
    ("XOM", 120.15, 118.60, 121.00, 117.80),
    ("CVX", 160.70, 159.90, 162.20, 158.10),
];

const SEED_LOT_NOTE: &str = "Seed lot";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoSeedSummary {
    pub sectors: usize,
    pub tickers: usize,
    pub lots_created: usize,
    pub lots_existing: usize,
    pub quotes: usize,
}

pub struct DemoSeeder {
    sector_repository: Arc<dyn SectorRepositoryTrait>,
    ticker_repository: Arc<dyn TickerRepositoryTrait>,
    lot_repository: Arc<dyn LotRepositoryTrait>,
    quote_cache: Arc<dyn QuoteCacheRepositoryTrait>,
}

impl DemoSeeder {
    pub fn new(
        sector_repository: Arc<dyn SectorRepositoryTrait>,
        ticker_repository: Arc<dyn TickerRepositoryTrait>,
        lot_repository: Arc<dyn LotRepositoryTrait>,
        quote_cache: Arc<dyn QuoteCacheRepositoryTrait>,
    ) -> Self {
        Self {
            sector_repository,
            ticker_repository,
            lot_repository,
            quote_cache,
        }
    }

    /// Seeds relative to the current date and time.
    pub async fn seed(&self) -> Result<DemoSeedSummary> {
        let now = Utc::now();
        self.seed_at(now.date_naive(), now).await
    }

    pub async fn seed_at(&self, today: NaiveDate, now: DateTime<Utc>) -> Result<DemoSeedSummary> {
        let mut summary = DemoSeedSummary::default();

        let sectors = self.ensure_sectors().await?;
        summary.sectors = sectors.len();
        info!("Ensured {} sectors", summary.sectors);

        let tickers = self.ensure_tickers(&sectors).await?;
        summary.tickers = tickers.len();
        info!("Ensured {} tickers", summary.tickers);

        for (symbol, quantity, price, days_ago) in demo_lots() {
            let Some(ticker) = tickers.get(symbol) else {
                continue;
            };
            let trade_date = today - Duration::days(days_ago);
            let exists = self
                .lot_repository
                .list(Some(ticker.id))?
                .iter()
                .any(|l| l.quantity == quantity && l.price == price && l.trade_date == trade_date);
            if exists {
                summary.lots_existing += 1;
                continue;
            }
            self.lot_repository
                .create(NewPurchaseLot {
                    ticker_id: ticker.id,
                    quantity,
                    price,
                    trade_date,
                    notes: SEED_LOT_NOTE.to_string(),
                })
                .await?;
            summary.lots_created += 1;
        }
        info!(
            "Created {} purchase lots ({} already present)",
            summary.lots_created, summary.lots_existing
        );

        for (symbol, c, pc, h, l) in DEMO_QUOTES {
            self.quote_cache
                .upsert(CachedQuote {
                    symbol: symbol.to_string(),
                    data: QuotePayload::from_prices(c, pc, h, l, now.timestamp()),
                    fetched_at: now.naive_utc(),
                })
                .await?;
            summary.quotes += 1;
        }
        info!("Cached quotes for {} symbols", summary.quotes);

        Ok(summary)
    }

    async fn ensure_sectors(&self) -> Result<HashMap<&'static str, Sector>> {
        let mut sectors = HashMap::new();
        for name in DEMO_SECTORS {
            let sector = match self.sector_repository.find_by_name(name)? {
                Some(existing) => existing,
                None => {
                    self.sector_repository
                        .create(NewSector {
                            name: name.to_string(),
                        })
                        .await?
                }
            };
            sectors.insert(name, sector);
        }
        Ok(sectors)
    }

    async fn ensure_tickers(
        &self,
        sectors: &HashMap<&'static str, Sector>,
    ) -> Result<HashMap<&'static str, Ticker>> {
        let mut tickers = HashMap::new();
        for (symbol, company_name, sector_name) in DEMO_TICKERS {
            let sector_id = sectors
                .get(sector_name)
                .map(|s| s.id)
                .ok_or_else(|| Error::Unexpected(format!("Demo sector {} missing", sector_name)))?;

            let ticker = match self.ticker_repository.find_by_symbol(symbol)? {
                Some(existing)
                    if existing.company_name == company_name && existing.sector_id == sector_id =>
                {
                    existing
                }
                Some(existing) => {
                    self.ticker_repository
                        .update(TickerUpdate {
                            id: existing.id,
                            symbol: existing.symbol,
                            company_name: company_name.to_string(),
                            sector_id,
                            security_type: Some(existing.security_type),
                        })
                        .await?
                }
                None => {
                    self.ticker_repository
                        .create(NewTicker {
                            symbol: symbol.to_string(),
                            company_name: company_name.to_string(),
                            sector_id,
                            security_type: Some(DEFAULT_SECURITY_TYPE.to_string()),
                        })
                        .await?
                }
            };
            tickers.insert(symbol, ticker);
        }
        Ok(tickers)
    }
}
