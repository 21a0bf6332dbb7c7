//! On-disk mirror of the last good server responses.
//!
//! The whole snapshot is one JSON document. A missing or unreadable file
//! loads as an empty snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use heatmap_core::quotes::QuoteBoard;
use heatmap_core::sectors::Sector;
use heatmap_core::tickers::TickerSummary;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheSnapshot {
    pub sectors: Vec<Sector>,
    pub tickers: Vec<TickerSummary>,
    pub quotes: Option<QuoteBoard>,
    /// Unix seconds of the last save.
    pub saved_at: Option<i64>,
}

impl CacheSnapshot {
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty() && self.tickers.is_empty() && self.quotes.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> CacheSnapshot {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return CacheSnapshot::default(),
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring unreadable cache {}: {}", self.path.display(), e);
            CacheSnapshot::default()
        })
    }

    /// [`load`](Self::load) on the blocking thread pool.
    pub async fn load_async(&self) -> CacheSnapshot {
        let cache = self.clone();
        tokio::task::spawn_blocking(move || cache.load())
            .await
            .unwrap_or_else(|e| {
                warn!("Cache load task failed: {}", e);
                CacheSnapshot::default()
            })
    }

    /// Writes the snapshot, stamping `saved_at`. The file is replaced atomically.
    pub fn save(&self, snapshot: &mut CacheSnapshot) -> Result<()> {
        let json = stamp(snapshot)?;
        self.write(&json)
    }

    /// [`save`](Self::save) with the file I/O on the blocking thread pool.
    pub async fn save_async(&self, snapshot: &mut CacheSnapshot) -> Result<()> {
        let json = stamp(snapshot)?;
        let cache = self.clone();
        tokio::task::spawn_blocking(move || cache.write(&json))
            .await
            .map_err(|e| ClientError::Cache(format!("cache write task failed: {}", e)))?
    }

    fn write(&self, json: &str) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| cache_error(dir, e))?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|e| cache_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| cache_error(&self.path, e))
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(cache_error(&self.path, e)),
        }
    }
}

fn stamp(snapshot: &mut CacheSnapshot) -> Result<String> {
    snapshot.saved_at = Some(Utc::now().timestamp());
    serde_json::to_string(snapshot).map_err(|e| ClientError::Cache(e.to_string()))
}

fn cache_error(path: &Path, err: std::io::Error) -> ClientError {
    ClientError::Cache(format!("{}: {}", path.display(), err))
}
