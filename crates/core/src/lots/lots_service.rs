use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::lots_model::{NewPurchaseLot, PurchaseLot, PurchaseLotUpdate};
use super::lots_traits::{LotRepositoryTrait, LotServiceTrait};
use crate::errors::{Error, Result};
use crate::tickers::TickerRepositoryTrait;

pub struct LotService {
    repository: Arc<dyn LotRepositoryTrait>,
    ticker_repository: Arc<dyn TickerRepositoryTrait>,
}

impl LotService {
    pub fn new(
        repository: Arc<dyn LotRepositoryTrait>,
        ticker_repository: Arc<dyn TickerRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            ticker_repository,
        }
    }

    fn ensure_ticker(&self, ticker_id: i32) -> Result<()> {
        match self.ticker_repository.get_by_id(ticker_id) {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Err(Error::field("ticker", "Ticker does not exist")),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl LotServiceTrait for LotService {
    fn get_lots(&self, ticker_id: Option<i32>) -> Result<Vec<PurchaseLot>> {
        self.repository.list(ticker_id)
    }

    async fn create_lot(&self, new_lot: NewPurchaseLot) -> Result<PurchaseLot> {
        let new_lot = new_lot.validate()?;
        self.ensure_ticker(new_lot.ticker_id)?;
        debug!(
            "Recording lot of {} @ {} for ticker {}",
            new_lot.quantity, new_lot.price, new_lot.ticker_id
        );
        self.repository.create(new_lot).await
    }

    async fn update_lot(&self, lot_update: PurchaseLotUpdate) -> Result<PurchaseLot> {
        self.repository.get_by_id(lot_update.id)?;
        let lot_update = lot_update.validate()?;
        self.ensure_ticker(lot_update.ticker_id)?;
        self.repository.update(lot_update).await
    }

    async fn delete_lot(&self, lot_id: i32) -> Result<()> {
        let deleted = self.repository.delete(lot_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Lot {}", lot_id)));
        }
        Ok(())
    }
}
