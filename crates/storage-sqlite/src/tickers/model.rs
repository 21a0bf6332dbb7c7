//! Database models for tickers.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use heatmap_core::constants::DEFAULT_SECURITY_TYPE;
use heatmap_core::tickers::{NewTicker, Ticker};

use crate::sectors::SectorDB;

#[derive(Queryable, Identifiable, Selectable, Associations, PartialEq, Debug, Clone)]
#[diesel(belongs_to(SectorDB, foreign_key = sector_id))]
#[diesel(table_name = crate::schema::tickers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TickerDB {
    pub id: i32,
    pub symbol: String,
    pub company_name: String,
    pub sector_id: i32,
    pub security_type: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::tickers)]
pub struct NewTickerDB {
    pub symbol: String,
    pub company_name: String,
    pub sector_id: i32,
    pub security_type: String,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::tickers)]
pub struct TickerChangesDB {
    pub symbol: String,
    pub company_name: String,
    pub sector_id: i32,
    pub security_type: String,
}

pub(crate) fn security_type_or_default(value: Option<String>) -> String {
    value
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SECURITY_TYPE.to_string())
}

impl From<TickerDB> for Ticker {
    fn from(db: TickerDB) -> Self {
        Self {
            id: db.id,
            symbol: db.symbol,
            company_name: db.company_name,
            sector_id: db.sector_id,
            security_type: db.security_type,
            created_at: db.created_at,
        }
    }
}

impl NewTickerDB {
    pub fn from_domain(domain: NewTicker, created_at: NaiveDateTime) -> Self {
        Self {
            symbol: domain.symbol,
            company_name: domain.company_name,
            sector_id: domain.sector_id,
            security_type: security_type_or_default(domain.security_type),
            created_at,
        }
    }
}
