//! Database models for sectors.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use heatmap_core::sectors::Sector;

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::sectors)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SectorDB {
    pub id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::sectors)]
pub struct NewSectorDB {
    pub name: String,
    pub created_at: NaiveDateTime,
}

impl From<SectorDB> for Sector {
    fn from(db: SectorDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            created_at: db.created_at,
        }
    }
}
