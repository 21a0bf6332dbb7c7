use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use heatmap_core::sectors::{NewSector, Sector, SectorRepositoryTrait, SectorUpdate};
use heatmap_core::Result;

use super::model::{NewSectorDB, SectorDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::sectors;

pub struct SectorRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SectorRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SectorRepository { pool, writer }
    }
}

#[async_trait]
impl SectorRepositoryTrait for SectorRepository {
    fn list(&self) -> Result<Vec<Sector>> {
        let mut conn = get_connection(&self.pool)?;
        // name is COLLATE NOCASE
        let rows = sectors::table
            .order((sectors::name.asc(), sectors::id.asc()))
            .select(SectorDB::as_select())
            .load::<SectorDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Sector::from).collect())
    }

    fn get_by_id(&self, sector_id: i32) -> Result<Sector> {
        let mut conn = get_connection(&self.pool)?;
        let row = sectors::table
            .find(sector_id)
            .select(SectorDB::as_select())
            .first::<SectorDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(row.into())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Sector>> {
        let mut conn = get_connection(&self.pool)?;
        let row = sectors::table
            .filter(sectors::name.eq(name))
            .select(SectorDB::as_select())
            .first::<SectorDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Sector::from))
    }

    async fn create(&self, new_sector: NewSector) -> Result<Sector> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Sector> {
                let row = diesel::insert_into(sectors::table)
                    .values(&NewSectorDB {
                        name: new_sector.name,
                        created_at: Utc::now().naive_utc(),
                    })
                    .returning(SectorDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, sector_update: SectorUpdate) -> Result<Sector> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Sector> {
                let row = diesel::update(sectors::table.find(sector_update.id))
                    .set(sectors::name.eq(sector_update.name))
                    .returning(SectorDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, sector_id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(sectors::table.find(sector_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
