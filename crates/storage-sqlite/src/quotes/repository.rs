use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use heatmap_core::quotes::{CachedQuote, QuoteCacheRepositoryTrait};
use heatmap_core::Result;

use super::model::CachedQuoteDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::cached_quotes;

pub struct QuoteCacheRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl QuoteCacheRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        QuoteCacheRepository { pool, writer }
    }
}

#[async_trait]
impl QuoteCacheRepositoryTrait for QuoteCacheRepository {
    fn get_many(&self, symbols: &[String]) -> Result<Vec<CachedQuote>> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = get_connection(&self.pool)?;
        let rows = cached_quotes::table
            .filter(cached_quotes::symbol.eq_any(symbols))
            .select(CachedQuoteDB::as_select())
            .load::<CachedQuoteDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(CachedQuote::from).collect())
    }

    fn get_all(&self) -> Result<Vec<CachedQuote>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = cached_quotes::table
            .order(cached_quotes::symbol.asc())
            .select(CachedQuoteDB::as_select())
            .load::<CachedQuoteDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(CachedQuote::from).collect())
    }

    async fn upsert(&self, quote: CachedQuote) -> Result<()> {
        let row = CachedQuoteDB::try_from(quote)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(cached_quotes::table)
                    .values(&row)
                    .on_conflict(cached_quotes::symbol)
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
