use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use heatmap_core::settings::{SiteConfig, SiteConfigRepositoryTrait};
use heatmap_core::Result;

use super::model::{SiteConfigDB, SITE_CONFIG_ID};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::site_config;

pub struct SiteConfigRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SiteConfigRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SiteConfigRepository { pool, writer }
    }
}

#[async_trait]
impl SiteConfigRepositoryTrait for SiteConfigRepository {
    fn get(&self) -> Result<SiteConfig> {
        let mut conn = get_connection(&self.pool)?;
        let row = site_config::table
            .find(SITE_CONFIG_ID)
            .select(SiteConfigDB::as_select())
            .first::<SiteConfigDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(SiteConfig::from).unwrap_or_default())
    }

    async fn set_api_key(&self, api_key: String) -> Result<SiteConfig> {
        let row = SiteConfigDB {
            id: SITE_CONFIG_ID,
            finnhub_api_key: api_key,
            updated_at: Some(Utc::now().naive_utc()),
        };
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SiteConfig> {
                let saved = diesel::insert_into(site_config::table)
                    .values(&row)
                    .on_conflict(site_config::id)
                    .do_update()
                    .set(&row)
                    .returning(SiteConfigDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(saved.into())
            })
            .await
    }
}
