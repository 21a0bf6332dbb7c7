use chrono::NaiveDateTime;
use diesel::prelude::*;

use heatmap_core::settings::SiteConfig;

/// The configuration table holds at most one row, always with this id.
pub const SITE_CONFIG_ID: i32 = 1;

#[derive(Queryable, Identifiable, Selectable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::site_config)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SiteConfigDB {
    pub id: i32,
    pub finnhub_api_key: String,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<SiteConfigDB> for SiteConfig {
    fn from(db: SiteConfigDB) -> Self {
        Self {
            finnhub_api_key: db.finnhub_api_key,
            updated_at: db.updated_at,
        }
    }
}
