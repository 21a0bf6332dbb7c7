//! Copilot heuristics: buy/sell/hold/momentum/breakout signals from simple
//! threshold rules over price, cost basis and range positions.

mod advisor_model;
mod rules;

pub use advisor_model::{
    AdvisorInput, AdvisorReport, AdvisorThresholds, Signal, SignalBucket,
};
pub use rules::{advise, evaluate};
