//! In-memory repositories shared by the service tests.
//!
//! `InMemoryStore` implements every repository trait over one shared state so
//! that services built from clones of the same store see each other's writes,
//! the same way they would share a database.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};

use crate::errors::{DatabaseError, Error, Result};
use crate::lots::{LotRepositoryTrait, NewPurchaseLot, PurchaseLot, PurchaseLotUpdate};
use crate::quotes::{CachedQuote, QuoteCacheRepositoryTrait};
use crate::sectors::{NewSector, Sector, SectorRepositoryTrait, SectorUpdate};
use crate::settings::{SiteConfig, SiteConfigRepositoryTrait};
use crate::tickers::{NewTicker, Ticker, TickerRepositoryTrait, TickerUpdate};

#[derive(Default)]
struct State {
    next_id: i32,
    sectors: BTreeMap<i32, Sector>,
    tickers: BTreeMap<i32, Ticker>,
    lots: BTreeMap<i32, PurchaseLot>,
    quotes: BTreeMap<String, CachedQuote>,
    config: SiteConfig,
}

impl State {
    fn id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl InMemoryStore {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Inserts a sector without going through validation.
    pub(crate) fn seed_sector(&self, name: &str) -> Sector {
        let mut state = self.state();
        if let Some(existing) = state
            .sectors
            .values()
            .find(|s| s.name.eq_ignore_ascii_case(name))
        {
            return existing.clone();
        }
        let sector = Sector {
            id: state.id(),
            name: name.to_string(),
            created_at: now(),
        };
        state.sectors.insert(sector.id, sector.clone());
        sector
    }

    /// Inserts a ticker, creating its sector when needed.
    pub(crate) fn seed_ticker(&self, symbol: &str, sector_name: &str) -> Ticker {
        let sector = self.seed_sector(sector_name);
        let mut state = self.state();
        let ticker = Ticker {
            id: state.id(),
            symbol: symbol.to_string(),
            company_name: format!("{} Inc", symbol),
            sector_id: sector.id,
            security_type: "Common Stock".to_string(),
            created_at: now(),
        };
        state.tickers.insert(ticker.id, ticker.clone());
        ticker
    }
}

fn not_found(what: &str, id: i32) -> Error {
    Error::Database(DatabaseError::NotFound(format!("{} {}", what, id)))
}

#[async_trait]
impl SectorRepositoryTrait for InMemoryStore {
    fn list(&self) -> Result<Vec<Sector>> {
        let mut sectors: Vec<Sector> = self.state().sectors.values().cloned().collect();
        sectors.sort_by_key(|s| s.name.to_lowercase());
        Ok(sectors)
    }

    fn get_by_id(&self, sector_id: i32) -> Result<Sector> {
        self.state()
            .sectors
            .get(&sector_id)
            .cloned()
            .ok_or_else(|| not_found("Sector", sector_id))
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Sector>> {
        Ok(self
            .state()
            .sectors
            .values()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn create(&self, new_sector: NewSector) -> Result<Sector> {
        let mut state = self.state();
        let sector = Sector {
            id: state.id(),
            name: new_sector.name,
            created_at: now(),
        };
        state.sectors.insert(sector.id, sector.clone());
        Ok(sector)
    }

    async fn update(&self, sector_update: SectorUpdate) -> Result<Sector> {
        let mut state = self.state();
        let sector = state
            .sectors
            .get_mut(&sector_update.id)
            .ok_or_else(|| not_found("Sector", sector_update.id))?;
        sector.name = sector_update.name;
        Ok(sector.clone())
    }

    async fn delete(&self, sector_id: i32) -> Result<usize> {
        let mut state = self.state();
        if state.sectors.remove(&sector_id).is_none() {
            return Ok(0);
        }
        let ticker_ids: Vec<i32> = state
            .tickers
            .values()
            .filter(|t| t.sector_id == sector_id)
            .map(|t| t.id)
            .collect();
        state.tickers.retain(|_, t| t.sector_id != sector_id);
        state.lots.retain(|_, l| !ticker_ids.contains(&l.ticker_id));
        Ok(1)
    }
}

#[async_trait]
impl TickerRepositoryTrait for InMemoryStore {
    fn list(&self) -> Result<Vec<Ticker>> {
        let mut tickers: Vec<Ticker> = self.state().tickers.values().cloned().collect();
        tickers.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(tickers)
    }

    fn get_by_id(&self, ticker_id: i32) -> Result<Ticker> {
        self.state()
            .tickers
            .get(&ticker_id)
            .cloned()
            .ok_or_else(|| not_found("Ticker", ticker_id))
    }

    fn find_by_symbol(&self, symbol: &str) -> Result<Option<Ticker>> {
        Ok(self
            .state()
            .tickers
            .values()
            .find(|t| t.symbol == symbol)
            .cloned())
    }

    async fn create(&self, new_ticker: NewTicker) -> Result<Ticker> {
        let mut state = self.state();
        if !state.sectors.contains_key(&new_ticker.sector_id) {
            return Err(Error::Database(DatabaseError::ForeignKeyViolation(
                "sector_id".to_string(),
            )));
        }
        let ticker = Ticker {
            id: state.id(),
            symbol: new_ticker.symbol,
            company_name: new_ticker.company_name,
            sector_id: new_ticker.sector_id,
            security_type: new_ticker.security_type.unwrap_or_default(),
            created_at: now(),
        };
        state.tickers.insert(ticker.id, ticker.clone());
        Ok(ticker)
    }

    async fn update(&self, ticker_update: TickerUpdate) -> Result<Ticker> {
        let mut state = self.state();
        let ticker = state
            .tickers
            .get_mut(&ticker_update.id)
            .ok_or_else(|| not_found("Ticker", ticker_update.id))?;
        ticker.symbol = ticker_update.symbol;
        ticker.company_name = ticker_update.company_name;
        ticker.sector_id = ticker_update.sector_id;
        ticker.security_type = ticker_update.security_type.unwrap_or_default();
        let updated = ticker.clone();
        for lot in state.lots.values_mut() {
            if lot.ticker_id == updated.id {
                lot.ticker_symbol = updated.symbol.clone();
            }
        }
        Ok(updated)
    }

    async fn delete(&self, ticker_id: i32) -> Result<usize> {
        let mut state = self.state();
        if state.tickers.remove(&ticker_id).is_none() {
            return Ok(0);
        }
        state.lots.retain(|_, l| l.ticker_id != ticker_id);
        Ok(1)
    }
}

#[async_trait]
impl LotRepositoryTrait for InMemoryStore {
    fn list(&self, ticker_id: Option<i32>) -> Result<Vec<PurchaseLot>> {
        let mut lots: Vec<PurchaseLot> = self
            .state()
            .lots
            .values()
            .filter(|l| ticker_id.is_none_or(|id| l.ticker_id == id))
            .cloned()
            .collect();
        lots.sort_by(|a, b| b.trade_date.cmp(&a.trade_date).then(b.id.cmp(&a.id)));
        Ok(lots)
    }

    fn get_by_id(&self, lot_id: i32) -> Result<PurchaseLot> {
        self.state()
            .lots
            .get(&lot_id)
            .cloned()
            .ok_or_else(|| not_found("Lot", lot_id))
    }

    async fn create(&self, new_lot: NewPurchaseLot) -> Result<PurchaseLot> {
        let mut state = self.state();
        let symbol = state
            .tickers
            .get(&new_lot.ticker_id)
            .map(|t| t.symbol.clone())
            .ok_or_else(|| {
                Error::Database(DatabaseError::ForeignKeyViolation("ticker_id".to_string()))
            })?;
        let lot = PurchaseLot {
            id: state.id(),
            ticker_id: new_lot.ticker_id,
            ticker_symbol: symbol,
            quantity: new_lot.quantity,
            price: new_lot.price,
            trade_date: new_lot.trade_date,
            notes: new_lot.notes,
            created_at: now(),
        };
        state.lots.insert(lot.id, lot.clone());
        Ok(lot)
    }

    async fn update(&self, lot_update: PurchaseLotUpdate) -> Result<PurchaseLot> {
        let mut state = self.state();
        let symbol = state
            .tickers
            .get(&lot_update.ticker_id)
            .map(|t| t.symbol.clone())
            .ok_or_else(|| {
                Error::Database(DatabaseError::ForeignKeyViolation("ticker_id".to_string()))
            })?;
        let lot = state
            .lots
            .get_mut(&lot_update.id)
            .ok_or_else(|| not_found("Lot", lot_update.id))?;
        lot.ticker_id = lot_update.ticker_id;
        lot.ticker_symbol = symbol;
        lot.quantity = lot_update.quantity;
        lot.price = lot_update.price;
        lot.trade_date = lot_update.trade_date;
        lot.notes = lot_update.notes;
        Ok(lot.clone())
    }

    async fn delete(&self, lot_id: i32) -> Result<usize> {
        Ok(usize::from(self.state().lots.remove(&lot_id).is_some()))
    }
}

#[async_trait]
impl QuoteCacheRepositoryTrait for InMemoryStore {
    fn get_many(&self, symbols: &[String]) -> Result<Vec<CachedQuote>> {
        let state = self.state();
        Ok(symbols
            .iter()
            .filter_map(|s| state.quotes.get(s).cloned())
            .collect())
    }

    fn get_all(&self) -> Result<Vec<CachedQuote>> {
        Ok(self.state().quotes.values().cloned().collect())
    }

    async fn upsert(&self, quote: CachedQuote) -> Result<()> {
        self.state().quotes.insert(quote.symbol.clone(), quote);
        Ok(())
    }
}

#[async_trait]
impl SiteConfigRepositoryTrait for InMemoryStore {
    fn get(&self) -> Result<SiteConfig> {
        Ok(self.state().config.clone())
    }

    async fn set_api_key(&self, api_key: String) -> Result<SiteConfig> {
        let mut state = self.state();
        state.config = SiteConfig {
            finnhub_api_key: api_key,
            updated_at: Some(now()),
        };
        Ok(state.config.clone())
    }
}
