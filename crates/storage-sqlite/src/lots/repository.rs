use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use heatmap_core::lots::{LotRepositoryTrait, NewPurchaseLot, PurchaseLot, PurchaseLotUpdate};
use heatmap_core::Result;

use super::model::{LotDB, NewLotDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{purchase_lots, tickers};

pub struct LotRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl LotRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        LotRepository { pool, writer }
    }
}

/// Loads a lot together with its ticker's symbol.
fn load_with_symbol(conn: &mut SqliteConnection, lot_id: i32) -> Result<PurchaseLot> {
    let (row, symbol) = purchase_lots::table
        .inner_join(tickers::table)
        .filter(purchase_lots::id.eq(lot_id))
        .select((LotDB::as_select(), tickers::symbol))
        .first::<(LotDB, String)>(conn)
        .map_err(StorageError::from)?;
    Ok(row.into_domain(symbol)?)
}

#[async_trait]
impl LotRepositoryTrait for LotRepository {
    fn list(&self, ticker_id: Option<i32>) -> Result<Vec<PurchaseLot>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = purchase_lots::table
            .inner_join(tickers::table)
            .select((LotDB::as_select(), tickers::symbol))
            .order((purchase_lots::trade_date.desc(), purchase_lots::id.desc()))
            .into_boxed();
        if let Some(ticker_id) = ticker_id {
            query = query.filter(purchase_lots::ticker_id.eq(ticker_id));
        }
        let rows = query
            .load::<(LotDB, String)>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|(row, symbol)| row.into_domain(symbol).map_err(Into::into))
            .collect()
    }

    fn get_by_id(&self, lot_id: i32) -> Result<PurchaseLot> {
        let mut conn = get_connection(&self.pool)?;
        load_with_symbol(&mut conn, lot_id)
    }

    async fn create(&self, new_lot: NewPurchaseLot) -> Result<PurchaseLot> {
        let row = NewLotDB::from(new_lot);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PurchaseLot> {
                let lot_id = diesel::insert_into(purchase_lots::table)
                    .values((&row, purchase_lots::created_at.eq(Utc::now().naive_utc())))
                    .returning(purchase_lots::id)
                    .get_result::<i32>(conn)
                    .map_err(StorageError::from)?;
                load_with_symbol(conn, lot_id)
            })
            .await
    }

    async fn update(&self, lot_update: PurchaseLotUpdate) -> Result<PurchaseLot> {
        let lot_id = lot_update.id;
        let changes = NewLotDB::from(lot_update);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PurchaseLot> {
                diesel::update(purchase_lots::table.find(lot_id))
                    .set(&changes)
                    .returning(purchase_lots::id)
                    .get_result::<i32>(conn)
                    .map_err(StorageError::from)?;
                load_with_symbol(conn, lot_id)
            })
            .await
    }

    async fn delete(&self, lot_id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(purchase_lots::table.find(lot_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
