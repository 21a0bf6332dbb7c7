//! US equity session status in exchange-local time.
//!
//! Sessions (America/New_York, weekdays only):
//! pre-market 04:00-09:30, regular 09:30-16:00, post-market 16:00-20:00.
//! Exchange holidays are not modelled.

use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::America::New_York;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketSession {
    #[serde(rename = "Pre-Market")]
    PreMarket,
    #[serde(rename = "Regular")]
    Regular,
    #[serde(rename = "Post-Market")]
    PostMarket,
    #[serde(rename = "Closed")]
    Closed,
}

impl MarketSession {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketSession::PreMarket => "Pre-Market",
            MarketSession::Regular => "Regular",
            MarketSession::PostMarket => "Post-Market",
            MarketSession::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStatus {
    pub is_open: bool,
    pub session: MarketSession,
    /// Unix seconds the status was computed for.
    pub timestamp: i64,
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Session status for the given instant.
pub fn compute_us_market_status(now: DateTime<Utc>) -> MarketStatus {
    let local = now.with_timezone(&New_York);
    let time = local.time();

    let session = match local.weekday() {
        Weekday::Sat | Weekday::Sun => MarketSession::Closed,
        _ if time >= hm(4, 0) && time < hm(9, 30) => MarketSession::PreMarket,
        _ if time >= hm(9, 30) && time < hm(16, 0) => MarketSession::Regular,
        _ if time >= hm(16, 0) && time < hm(20, 0) => MarketSession::PostMarket,
        _ => MarketSession::Closed,
    };

    MarketStatus {
        is_open: session == MarketSession::Regular,
        session,
        timestamp: now.timestamp(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ny(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        New_York
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_sessions_on_a_weekday() {
        // Wednesday, 2024-03-13 (EDT)
        let cases = [
            (3, 59, MarketSession::Closed),
            (4, 0, MarketSession::PreMarket),
            (9, 29, MarketSession::PreMarket),
            (9, 30, MarketSession::Regular),
            (15, 59, MarketSession::Regular),
            (16, 0, MarketSession::PostMarket),
            (19, 59, MarketSession::PostMarket),
            (20, 0, MarketSession::Closed),
        ];
        for (h, m, expected) in cases {
            let status = compute_us_market_status(ny(2024, 3, 13, h, m));
            assert_eq!(status.session, expected, "{h:02}:{m:02}");
            assert_eq!(status.is_open, expected == MarketSession::Regular);
        }
    }

    #[test]
    fn test_weekend_is_closed() {
        let status = compute_us_market_status(ny(2024, 3, 16, 11, 0));
        assert_eq!(status.session, MarketSession::Closed);
        assert!(!status.is_open);
    }

    #[test]
    fn test_uses_new_york_time_not_utc() {
        // 14:00 UTC in January is 09:00 EST, still pre-market
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 14, 0, 0).unwrap();
        assert_eq!(compute_us_market_status(now).session, MarketSession::PreMarket);
        assert_eq!(compute_us_market_status(now).timestamp, now.timestamp());
    }

    #[test]
    fn test_session_serializes_with_display_names() {
        let json = serde_json::to_value(compute_us_market_status(ny(2024, 3, 13, 10, 0))).unwrap();
        assert_eq!(json["session"], "Regular");
        assert_eq!(json["isOpen"], true);
    }
}
