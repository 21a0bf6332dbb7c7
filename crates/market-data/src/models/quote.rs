use serde::{Deserialize, Serialize};

/// Real-time quote snapshot as reported by the provider.
///
/// Field names follow the provider's short keys so the payload can be cached
/// and replayed to clients without translation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderQuote {
    /// Current price
    pub c: Option<f64>,
    /// Previous close
    pub pc: Option<f64>,
    /// High price of the day
    pub h: Option<f64>,
    /// Low price of the day
    pub l: Option<f64>,
    /// Change since previous close
    pub d: Option<f64>,
    /// Percent change since previous close
    pub dp: Option<f64>,
    /// Quote timestamp (Unix seconds)
    pub t: Option<i64>,
    /// Pre-market price. Not provided by Finnhub's quote endpoint.
    pub pre: Option<f64>,
    /// Post-market price. Not provided by Finnhub's quote endpoint.
    pub post: Option<f64>,
}

impl ProviderQuote {
    /// True when the provider returned an all-zero quote, which is how
    /// Finnhub answers for unknown symbols.
    pub fn is_empty(&self) -> bool {
        let zero = |v: Option<f64>| v.map_or(true, |x| x == 0.0);
        zero(self.c) && zero(self.pc) && zero(self.h) && zero(self.l)
    }
}

/// 52-week trading range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRange {
    pub week52_high: Option<f64>,
    pub week52_low: Option<f64>,
}
