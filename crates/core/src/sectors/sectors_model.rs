//! Sector domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::SECTOR_NAME_MAX_LEN;
use crate::errors::{Error, Result};

/// Domain model representing a sector grouping of tickers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
}

/// Input model for creating a new sector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSector {
    pub name: String,
}

/// Input model for renaming a sector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorUpdate {
    #[serde(default)]
    pub id: i32,
    pub name: String,
}

/// Trims and title-cases a sector name.
///
/// Names shorter than two characters are rejected.
pub fn normalize_sector_name(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::field("name", "Sector name is required"));
    }
    if trimmed.chars().count() < 2 {
        return Err(Error::field(
            "name",
            "Sector name must be at least 2 characters",
        ));
    }
    if trimmed.chars().count() > SECTOR_NAME_MAX_LEN {
        return Err(Error::field(
            "name",
            format!("Sector name must be at most {} characters", SECTOR_NAME_MAX_LEN),
        ));
    }
    Ok(title_case(trimmed))
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_alpha = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
