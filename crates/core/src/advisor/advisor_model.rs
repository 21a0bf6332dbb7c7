//! Advisor input, thresholds and output models.

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::heatmap::HeatmapTile;

/// Numeric thresholds for the advisor rules. Percentages are in percent units
/// (`12.0` means 12 %), range positions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvisorThresholds {
    /// Trim when unrealized gain is above this...
    pub trim_gain_pct: f64,
    /// ...and the day change is below this...
    pub trim_day_change_pct: f64,
    /// ...or the 52-week position is above this.
    pub trim_week52_position: f64,
    /// Add when unrealized gain is below this...
    pub add_loss_pct: f64,
    /// ...and the 52-week position is below this...
    pub add_week52_position: f64,
    /// ...and the day change is above this.
    pub add_min_day_change_pct: f64,
    pub momentum_change_pct: f64,
    pub momentum_day_position: f64,
    pub breakout_change_pct: f64,
    pub breakout_week52_position: f64,
}

impl Default for AdvisorThresholds {
    fn default() -> Self {
        Self {
            trim_gain_pct: 12.0,
            trim_day_change_pct: -0.3,
            trim_week52_position: 0.9,
            add_loss_pct: -8.0,
            add_week52_position: 0.25,
            add_min_day_change_pct: -0.2,
            momentum_change_pct: 2.0,
            momentum_day_position: 0.8,
            breakout_change_pct: 1.0,
            breakout_week52_position: 0.98,
        }
    }
}

/// Everything the rules look at for one ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorInput {
    pub symbol: String,
    pub price: Option<f64>,
    pub change_percent: Option<f64>,
    pub day_position: Option<f64>,
    pub week52_position: Option<f64>,
    /// Quantity held; `None` or zero when there are no lots.
    pub quantity: Option<f64>,
    pub average_cost: Option<f64>,
}

impl AdvisorInput {
    pub fn is_held(&self) -> bool {
        self.quantity.is_some_and(|q| q > 0.0)
    }

    /// Percent gain of the price over the average cost.
    pub fn unrealized_pct(&self) -> Option<f64> {
        let price = self.price?;
        let cost = self.average_cost.filter(|c| *c > 0.0)?;
        Some((price - cost) / cost * 100.0)
    }
}

impl From<&HeatmapTile> for AdvisorInput {
    fn from(tile: &HeatmapTile) -> Self {
        Self {
            symbol: tile.symbol.clone(),
            price: tile.price,
            change_percent: tile.change_percent,
            day_position: tile.day_range.position,
            week52_position: tile.week52_range.position,
            quantity: tile.holding.and_then(|h| h.quantity.to_f64()),
            average_cost: tile
                .holding
                .and_then(|h| h.average_cost)
                .and_then(|c| c.to_f64()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalBucket {
    Buy,
    Sell,
    Hold,
    Momentum,
    Breakout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub symbol: String,
    pub bucket: SignalBucket,
    pub message: String,
}

/// Signals sorted into buckets, each in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorReport {
    pub buy: Vec<Signal>,
    pub sell: Vec<Signal>,
    pub hold: Vec<Signal>,
    pub momentum: Vec<Signal>,
    pub breakout: Vec<Signal>,
}

impl AdvisorReport {
    pub fn push(&mut self, signal: Signal) {
        match signal.bucket {
            SignalBucket::Buy => self.buy.push(signal),
            SignalBucket::Sell => self.sell.push(signal),
            SignalBucket::Hold => self.hold.push(signal),
            SignalBucket::Momentum => self.momentum.push(signal),
            SignalBucket::Breakout => self.breakout.push(signal),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buy.is_empty()
            && self.sell.is_empty()
            && self.hold.is_empty()
            && self.momentum.is_empty()
            && self.breakout.is_empty()
    }
}
