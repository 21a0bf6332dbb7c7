//! Heatmap tile models and the pure helpers behind them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::market_status::MarketStatus;

/// Percent change at or inside which a tile is drawn as flat.
pub const FLAT_THRESHOLD_PCT: f64 = 0.15;

/// Color class of a heatmap tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileClass {
    Gain,
    Flat,
    Loss,
    #[serde(rename = "nodata")]
    NoData,
}

impl TileClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileClass::Gain => "gain",
            TileClass::Flat => "flat",
            TileClass::Loss => "loss",
            TileClass::NoData => "nodata",
        }
    }
}

/// Classifies a percent daily change.
pub fn classify_change(dp: Option<f64>) -> TileClass {
    match dp {
        Some(v) if !v.is_finite() => TileClass::NoData,
        Some(v) if v > FLAT_THRESHOLD_PCT => TileClass::Gain,
        Some(v) if v < -FLAT_THRESHOLD_PCT => TileClass::Loss,
        Some(_) => TileClass::Flat,
        None => TileClass::NoData,
    }
}

/// Where `price` sits between `low` and `high`, clamped to `[0, 1]`.
///
/// A zero-width range yields 0.5. Inverted bounds are swapped.
pub fn range_position(price: Option<f64>, low: Option<f64>, high: Option<f64>) -> Option<f64> {
    let (price, mut low, mut high) = (price?, low?, high?);
    if !(price.is_finite() && low.is_finite() && high.is_finite()) {
        return None;
    }
    if low > high {
        std::mem::swap(&mut low, &mut high);
    }
    if high == low {
        return Some(0.5);
    }
    Some(((price - low) / (high - low)).clamp(0.0, 1.0))
}

/// A bar with a marker, e.g. the day range or the 52-week range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeMarker {
    pub low: Option<f64>,
    pub high: Option<f64>,
    /// Marker position in `[0, 1]`, `None` when it cannot be placed.
    pub position: Option<f64>,
}

impl RangeMarker {
    pub fn new(price: Option<f64>, low: Option<f64>, high: Option<f64>) -> Self {
        Self {
            low,
            high,
            position: range_position(price, low, high),
        }
    }
}

/// Position held in a ticker, valued at the tile's price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub quantity: Decimal,
    pub cost_basis: Decimal,
    pub average_cost: Option<Decimal>,
    pub market_value: Option<Decimal>,
    pub unrealized_gain: Option<Decimal>,
    pub unrealized_gain_pct: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapTile {
    pub ticker_id: i32,
    pub symbol: String,
    pub company_name: String,
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub class: TileClass,
    pub day_range: RangeMarker,
    pub week52_range: RangeMarker,
    pub holding: Option<Holding>,
    /// Provider error for this symbol, if the last refresh reported one.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorGroup {
    pub sector_id: i32,
    pub sector_name: String,
    pub tiles: Vec<HeatmapTile>,
    /// Sum of holding market values in the group.
    pub market_value: Decimal,
    /// Mean percent change over tiles that have one.
    pub avg_change_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapBoard {
    pub as_of: i64,
    pub market_status: MarketStatus,
    pub groups: Vec<SectorGroup>,
}
