//! Database model for cached quotes. The payload is stored as a JSON string.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::warn;

use heatmap_core::quotes::{CachedQuote, QuotePayload};

use crate::errors::StorageError;

#[derive(Queryable, Identifiable, Selectable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::cached_quotes)]
#[diesel(primary_key(symbol))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CachedQuoteDB {
    pub symbol: String,
    pub data: String,
    pub fetched_at: NaiveDateTime,
}

impl From<CachedQuoteDB> for CachedQuote {
    /// Unreadable payloads load as empty so the next refresh overwrites them.
    fn from(db: CachedQuoteDB) -> Self {
        let data = serde_json::from_str::<QuotePayload>(&db.data).unwrap_or_else(|e| {
            warn!("Discarding unreadable cached quote for {}: {}", db.symbol, e);
            QuotePayload::default()
        });
        Self {
            symbol: db.symbol,
            data,
            fetched_at: db.fetched_at,
        }
    }
}

impl TryFrom<CachedQuote> for CachedQuoteDB {
    type Error = StorageError;

    fn try_from(domain: CachedQuote) -> Result<Self, Self::Error> {
        Ok(Self {
            data: serde_json::to_string(&domain.data)?,
            symbol: domain.symbol,
            fetched_at: domain.fetched_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_payload_loads_empty() {
        let quote: CachedQuote = CachedQuoteDB {
            symbol: "AAPL".to_string(),
            data: "{not json".to_string(),
            fetched_at: NaiveDateTime::default(),
        }
        .into();
        assert!(!quote.data.has_data());
    }

    #[test]
    fn test_payload_is_camel_case_json() {
        let mut data = QuotePayload::from_prices(10.0, 8.0, 11.0, 7.5, 1_700_000_000);
        data.week52_high = Some(12.0);
        let row = CachedQuoteDB::try_from(CachedQuote {
            symbol: "ABC".to_string(),
            data,
            fetched_at: NaiveDateTime::default(),
        })
        .unwrap();
        assert!(row.data.contains("\"week52High\":12.0"));
        assert!(row.data.contains("\"dp\":25.0"));
    }
}
