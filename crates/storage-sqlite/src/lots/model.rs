//! Database models for purchase lots.
//!
//! Quantities and prices are stored as TEXT so no precision is lost.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use heatmap_core::lots::{NewPurchaseLot, PurchaseLot, PurchaseLotUpdate};

use crate::errors::StorageError;
use crate::tickers::TickerDB;

#[derive(Queryable, Identifiable, Selectable, Associations, PartialEq, Debug, Clone)]
#[diesel(belongs_to(TickerDB, foreign_key = ticker_id))]
#[diesel(table_name = crate::schema::purchase_lots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LotDB {
    pub id: i32,
    pub ticker_id: i32,
    pub quantity: String,
    pub price: String,
    pub trade_date: NaiveDate,
    pub notes: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::purchase_lots)]
pub struct NewLotDB {
    pub ticker_id: i32,
    pub quantity: String,
    pub price: String,
    pub trade_date: NaiveDate,
    pub notes: String,
}

fn parse_decimal(column: &str, value: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value).map_err(|e| {
        StorageError::SerializationError(format!("purchase_lots.{} '{}': {}", column, value, e))
    })
}

impl LotDB {
    pub fn into_domain(self, ticker_symbol: String) -> Result<PurchaseLot, StorageError> {
        Ok(PurchaseLot {
            id: self.id,
            ticker_id: self.ticker_id,
            ticker_symbol,
            quantity: parse_decimal("quantity", &self.quantity)?,
            price: parse_decimal("price", &self.price)?,
            trade_date: self.trade_date,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

impl From<NewPurchaseLot> for NewLotDB {
    fn from(domain: NewPurchaseLot) -> Self {
        Self {
            ticker_id: domain.ticker_id,
            quantity: domain.quantity.normalize().to_string(),
            price: domain.price.normalize().to_string(),
            trade_date: domain.trade_date,
            notes: domain.notes,
        }
    }
}

impl From<PurchaseLotUpdate> for NewLotDB {
    fn from(domain: PurchaseLotUpdate) -> Self {
        Self {
            ticker_id: domain.ticker_id,
            quantity: domain.quantity.normalize().to_string(),
            price: domain.price.normalize().to_string(),
            trade_date: domain.trade_date,
            notes: domain.notes,
        }
    }
}
