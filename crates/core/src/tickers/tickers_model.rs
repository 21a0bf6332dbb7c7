//! Ticker domain models.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{COMPANY_NAME_MAX_LEN, DEFAULT_SECURITY_TYPE, SECURITY_TYPE_MAX_LEN};
use crate::errors::{Error, Result};

static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9.\-]{0,9}$").expect("valid symbol regex"));

/// Domain model representing a tracked stock ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    pub id: i32,
    pub symbol: String,
    pub company_name: String,
    pub sector_id: i32,
    pub security_type: String,
    pub created_at: NaiveDateTime,
}

/// Input model for creating a new ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicker {
    pub symbol: String,
    #[serde(default)]
    pub company_name: String,
    pub sector_id: i32,
    #[serde(default)]
    pub security_type: Option<String>,
}

/// Input model for updating an existing ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerUpdate {
    #[serde(default)]
    pub id: i32,
    pub symbol: String,
    #[serde(default)]
    pub company_name: String,
    pub sector_id: i32,
    #[serde(default)]
    pub security_type: Option<String>,
}

/// Ticker enriched with its sector name and lot aggregates.
///
/// `lots_qty`, `lots_cost` and `avg_cost` are `None` when the ticker has no lots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerSummary {
    #[serde(flatten)]
    pub ticker: Ticker,
    pub sector_name: String,
    pub lots_qty: Option<Decimal>,
    pub lots_cost: Option<Decimal>,
    pub avg_cost: Option<Decimal>,
}

/// Trims and upper-cases a symbol, then checks it against the allowed pattern.
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(Error::field("symbol", "Symbol is required"));
    }
    if symbol.chars().count() > 10 {
        return Err(Error::field("symbol", "Symbol too long"));
    }
    if !SYMBOL_RE.is_match(&symbol) {
        return Err(Error::field(
            "symbol",
            "Ticker symbol must be 1-10 chars, A-Z, digits, '.' or '-'",
        ));
    }
    Ok(symbol)
}

/// Normalized ticker fields shared by create and update.
pub(crate) struct TickerFields {
    pub symbol: String,
    pub company_name: String,
    pub security_type: String,
}

pub(crate) fn normalize_ticker_fields(
    symbol: &str,
    company_name: &str,
    security_type: Option<&str>,
) -> Result<TickerFields> {
    let symbol = normalize_symbol(symbol)?;
    let company_name = company_name.trim().to_string();
    if company_name.chars().count() > COMPANY_NAME_MAX_LEN {
        return Err(Error::field(
            "company_name",
            format!("Company name must be at most {} characters", COMPANY_NAME_MAX_LEN),
        ));
    }
    let security_type = security_type
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SECURITY_TYPE)
        .to_string();
    if security_type.chars().count() > SECURITY_TYPE_MAX_LEN {
        return Err(Error::field(
            "security_type",
            format!("Security type must be at most {} characters", SECURITY_TYPE_MAX_LEN),
        ));
    }
    Ok(TickerFields {
        symbol,
        company_name,
        security_type,
    })
}
