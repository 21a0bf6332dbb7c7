//! Quote domain models.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use heatmap_market_data::{ProviderQuote, WeekRange};
use serde::{Deserialize, Serialize};

use crate::market_status::MarketStatus;

/// Quote payload as cached and served to clients.
///
/// Carries the provider's short keys plus the 52-week range and the Unix
/// time that range was fetched at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotePayload {
    pub c: Option<f64>,
    pub pc: Option<f64>,
    pub h: Option<f64>,
    pub l: Option<f64>,
    pub dp: Option<f64>,
    pub d: Option<f64>,
    pub t: Option<i64>,
    pub pre: Option<f64>,
    pub post: Option<f64>,
    #[serde(rename = "week52High", skip_serializing_if = "Option::is_none")]
    pub week52_high: Option<f64>,
    #[serde(rename = "week52Low", skip_serializing_if = "Option::is_none")]
    pub week52_low: Option<f64>,
    #[serde(rename = "metricsAsOf", skip_serializing_if = "Option::is_none")]
    pub metrics_as_of: Option<i64>,
}

impl QuotePayload {
    /// True when at least one price field is present.
    pub fn has_data(&self) -> bool {
        self.c.is_some() || self.pc.is_some() || self.h.is_some() || self.l.is_some()
    }

    /// Replaces the 52-week range and stamps it with `as_of`.
    pub fn with_metrics(mut self, range: &WeekRange, as_of: i64) -> Self {
        self.week52_high = range.week52_high;
        self.week52_low = range.week52_low;
        self.metrics_as_of = Some(as_of);
        self
    }

    /// Copies the 52-week range (and its timestamp) from an older payload.
    pub fn carry_metrics_from(mut self, older: &QuotePayload) -> Self {
        self.week52_high = older.week52_high;
        self.week52_low = older.week52_low;
        self.metrics_as_of = older.metrics_as_of;
        self
    }

    /// Builds a payload from prices, deriving change fields from the previous close.
    pub fn from_prices(c: f64, pc: f64, h: f64, l: f64, t: i64) -> Self {
        let round2 = |v: f64| (v * 100.0).round() / 100.0;
        let (d, dp) = if pc != 0.0 {
            (Some(round2(c - pc)), Some(round2((c - pc) / pc * 100.0)))
        } else {
            (None, None)
        };
        Self {
            c: Some(round2(c)),
            pc: Some(round2(pc)),
            h: Some(round2(h)),
            l: Some(round2(l)),
            d,
            dp,
            t: Some(t),
            ..Self::default()
        }
    }
}

impl From<ProviderQuote> for QuotePayload {
    fn from(q: ProviderQuote) -> Self {
        Self {
            c: q.c,
            pc: q.pc,
            h: q.h,
            l: q.l,
            dp: q.dp,
            d: q.d,
            t: q.t,
            pre: q.pre,
            post: q.post,
            ..Self::default()
        }
    }
}

/// Last successful quote for a symbol, as persisted by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedQuote {
    pub symbol: String,
    pub data: QuotePayload,
    /// UTC time the payload was last fetched from the provider.
    pub fetched_at: NaiveDateTime,
}

/// Response of a quote refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBoard {
    /// Unix seconds the board was assembled at.
    pub as_of: i64,
    pub market_status: MarketStatus,
    pub quotes: BTreeMap<String, QuotePayload>,
    /// Per-symbol error strings, e.g. `"RATE_LIMIT: ... (using cached)"`.
    pub errors: BTreeMap<String, String>,
}

/// Tunables for [`QuoteService`](super::QuoteService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteServiceConfig {
    /// Cached quotes younger than this are served without a live fetch.
    /// Zero disables the short-lived cache.
    pub quote_ttl_secs: i64,
    /// 52-week metrics older than this are refetched. Zero or negative
    /// refetches on every refresh.
    pub metrics_ttl_secs: i64,
    /// Upper bound on concurrent provider calls. Clamped to at least 1.
    pub max_concurrency: usize,
}

impl Default for QuoteServiceConfig {
    fn default() -> Self {
        Self {
            quote_ttl_secs: 10,
            metrics_ttl_secs: 21_600,
            max_concurrency: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_prices_derives_change() {
        let payload = QuotePayload::from_prices(182.11, 180.22, 184.50, 178.90, 1_700_000_000);
        assert_eq!(payload.d, Some(1.89));
        assert_eq!(payload.dp, Some(1.05));
        assert!(payload.has_data());
    }

    #[test]
    fn test_from_prices_without_previous_close() {
        let payload = QuotePayload::from_prices(10.0, 0.0, 10.0, 10.0, 0);
        assert!(payload.d.is_none());
        assert!(payload.dp.is_none());
    }

    #[test]
    fn test_payload_serializes_provider_keys() {
        let payload = QuotePayload {
            c: Some(1.0),
            week52_high: Some(2.0),
            metrics_as_of: Some(5),
            ..QuotePayload::default()
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["c"], 1.0);
        assert_eq!(json["week52High"], 2.0);
        assert_eq!(json["metricsAsOf"], 5);
        assert!(json.get("week52Low").is_none());
        assert!(json["pre"].is_null());
    }

    #[test]
    fn test_payload_deserializes_partial_json() {
        let payload: QuotePayload = serde_json::from_str(r#"{"c": 3.5}"#).unwrap();
        assert_eq!(payload.c, Some(3.5));
        assert!(payload.metrics_as_of.is_none());
    }
}
