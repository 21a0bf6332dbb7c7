use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::tickers_model::{normalize_ticker_fields, NewTicker, Ticker, TickerSummary, TickerUpdate};
use super::tickers_traits::{TickerRepositoryTrait, TickerServiceTrait};
use crate::errors::{Error, Result};
use crate::lots::{LotRepositoryTrait, Position, PurchaseLot};
use crate::sectors::SectorRepositoryTrait;

pub struct TickerService {
    repository: Arc<dyn TickerRepositoryTrait>,
    sector_repository: Arc<dyn SectorRepositoryTrait>,
    lot_repository: Arc<dyn LotRepositoryTrait>,
}

impl TickerService {
    pub fn new(
        repository: Arc<dyn TickerRepositoryTrait>,
        sector_repository: Arc<dyn SectorRepositoryTrait>,
        lot_repository: Arc<dyn LotRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            sector_repository,
            lot_repository,
        }
    }

    fn ensure_sector(&self, sector_id: i32) -> Result<()> {
        match self.sector_repository.get_by_id(sector_id) {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Err(Error::field("sector", "Sector does not exist")),
            Err(e) => Err(e),
        }
    }

    fn ensure_unique(&self, symbol: &str, current_id: Option<i32>) -> Result<()> {
        match self.repository.find_by_symbol(symbol)? {
            Some(existing) if Some(existing.id) != current_id => Err(Error::field(
                "symbol",
                "Ticker with this symbol already exists",
            )),
            _ => Ok(()),
        }
    }

    fn summarize(&self, tickers: Vec<Ticker>) -> Result<Vec<TickerSummary>> {
        let sector_names: HashMap<i32, String> = self
            .sector_repository
            .list()?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let mut lots_by_ticker: HashMap<i32, Vec<PurchaseLot>> = HashMap::new();
        for lot in self.lot_repository.list(None)? {
            lots_by_ticker.entry(lot.ticker_id).or_default().push(lot);
        }

        Ok(tickers
            .into_iter()
            .map(|ticker| {
                let position = lots_by_ticker
                    .get(&ticker.id)
                    .and_then(|lots| Position::from_lots(lots));
                TickerSummary {
                    sector_name: sector_names
                        .get(&ticker.sector_id)
                        .cloned()
                        .unwrap_or_default(),
                    lots_qty: position.map(|p| p.quantity),
                    lots_cost: position.map(|p| p.cost_basis),
                    avg_cost: position.and_then(|p| p.average_cost),
                    ticker,
                }
            })
            .collect())
    }
}

#[async_trait]
impl TickerServiceTrait for TickerService {
    fn get_tickers(&self) -> Result<Vec<TickerSummary>> {
        let tickers = self.repository.list()?;
        self.summarize(tickers)
    }

    fn get_ticker(&self, ticker_id: i32) -> Result<TickerSummary> {
        let ticker = self.repository.get_by_id(ticker_id)?;
        self.summarize(vec![ticker])?
            .pop()
            .ok_or_else(|| Error::NotFound(format!("Ticker {}", ticker_id)))
    }

    fn get_symbols(&self) -> Result<Vec<String>> {
        Ok(self
            .repository
            .list()?
            .into_iter()
            .map(|t| t.symbol)
            .collect())
    }

    async fn create_ticker(&self, new_ticker: NewTicker) -> Result<Ticker> {
        let fields = normalize_ticker_fields(
            &new_ticker.symbol,
            &new_ticker.company_name,
            new_ticker.security_type.as_deref(),
        )?;
        self.ensure_sector(new_ticker.sector_id)?;
        self.ensure_unique(&fields.symbol, None)?;
        debug!("Creating ticker {}", fields.symbol);
        self.repository
            .create(NewTicker {
                symbol: fields.symbol,
                company_name: fields.company_name,
                sector_id: new_ticker.sector_id,
                security_type: Some(fields.security_type),
            })
            .await
    }

    async fn update_ticker(&self, ticker_update: TickerUpdate) -> Result<Ticker> {
        self.repository.get_by_id(ticker_update.id)?;
        let fields = normalize_ticker_fields(
            &ticker_update.symbol,
            &ticker_update.company_name,
            ticker_update.security_type.as_deref(),
        )?;
        self.ensure_sector(ticker_update.sector_id)?;
        self.ensure_unique(&fields.symbol, Some(ticker_update.id))?;
        self.repository
            .update(TickerUpdate {
                id: ticker_update.id,
                symbol: fields.symbol,
                company_name: fields.company_name,
                sector_id: ticker_update.sector_id,
                security_type: Some(fields.security_type),
            })
            .await
    }

    async fn delete_ticker(&self, ticker_id: i32) -> Result<()> {
        let deleted = self.repository.delete(ticker_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Ticker {}", ticker_id)));
        }
        Ok(())
    }
}
