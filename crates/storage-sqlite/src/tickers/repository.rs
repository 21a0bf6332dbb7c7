use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use heatmap_core::tickers::{NewTicker, Ticker, TickerRepositoryTrait, TickerUpdate};
use heatmap_core::Result;

use super::model::{security_type_or_default, NewTickerDB, TickerChangesDB, TickerDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::tickers;

pub struct TickerRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TickerRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TickerRepository { pool, writer }
    }
}

#[async_trait]
impl TickerRepositoryTrait for TickerRepository {
    fn list(&self) -> Result<Vec<Ticker>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = tickers::table
            .order(tickers::symbol.asc())
            .select(TickerDB::as_select())
            .load::<TickerDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Ticker::from).collect())
    }

    fn get_by_id(&self, ticker_id: i32) -> Result<Ticker> {
        let mut conn = get_connection(&self.pool)?;
        let row = tickers::table
            .find(ticker_id)
            .select(TickerDB::as_select())
            .first::<TickerDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(row.into())
    }

    fn find_by_symbol(&self, symbol: &str) -> Result<Option<Ticker>> {
        let mut conn = get_connection(&self.pool)?;
        let row = tickers::table
            .filter(tickers::symbol.eq(symbol))
            .select(TickerDB::as_select())
            .first::<TickerDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Ticker::from))
    }

    async fn create(&self, new_ticker: NewTicker) -> Result<Ticker> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Ticker> {
                let row = diesel::insert_into(tickers::table)
                    .values(&NewTickerDB::from_domain(new_ticker, Utc::now().naive_utc()))
                    .returning(TickerDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, ticker_update: TickerUpdate) -> Result<Ticker> {
        let changes = TickerChangesDB {
            symbol: ticker_update.symbol,
            company_name: ticker_update.company_name,
            sector_id: ticker_update.sector_id,
            security_type: security_type_or_default(ticker_update.security_type),
        };
        let ticker_id = ticker_update.id;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Ticker> {
                let row = diesel::update(tickers::table.find(ticker_id))
                    .set(&changes)
                    .returning(TickerDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, ticker_id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(tickers::table.find(ticker_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
