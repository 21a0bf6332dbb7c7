//! Plain-text rendering of the dashboard.

use std::fmt::Write;

use chrono::{TimeZone, Utc};
use heatmap_client::DashboardView;
use heatmap_core::advisor::{AdvisorReport, Signal};
use heatmap_core::heatmap::{HeatmapTile, RangeMarker};
use heatmap_core::market_status::MarketStatus;
use heatmap_market_data::SearchResult;
use rust_decimal::Decimal;

const MARKER_WIDTH: usize = 10;

fn price(v: Option<f64>) -> String {
    v.map_or_else(|| "--".to_string(), |v| format!("{:.2}", v))
}

fn percent(v: Option<f64>) -> String {
    v.map_or_else(|| "--".to_string(), |v| format!("{:+.2}%", v))
}

fn money(v: Option<Decimal>) -> String {
    v.map_or_else(|| "--".to_string(), |v| format!("{:.2}", v.round_dp(2)))
}

/// `[----|-----]` style marker, or blanks when the position is unknown.
pub fn range_bar(marker: &RangeMarker) -> String {
    match marker.position {
        Some(pos) => {
            let idx = ((pos.clamp(0.0, 1.0)) * (MARKER_WIDTH - 1) as f64).round() as usize;
            let bar: String = (0..MARKER_WIDTH)
                .map(|i| if i == idx { '|' } else { '-' })
                .collect();
            format!("[{}]", bar)
        }
        None => format!("[{}]", " ".repeat(MARKER_WIDTH)),
    }
}

pub fn tile_line(tile: &HeatmapTile) -> String {
    let mut line = format!(
        "  {:<6} {:>10} {:>8} {:<6} day {} 52w {}",
        tile.symbol,
        price(tile.price),
        percent(tile.change_percent),
        tile.class.as_str(),
        range_bar(&tile.day_range),
        range_bar(&tile.week52_range),
    );
    if let Some(h) = &tile.holding {
        let _ = write!(
            line,
            "  qty {} avg {} p/l {}",
            h.quantity.normalize(),
            money(h.average_cost),
            money(h.unrealized_gain)
        );
    }
    if let Some(err) = &tile.error {
        let _ = write!(line, "  ({})", err);
    }
    line
}

pub fn status_line(status: &MarketStatus) -> String {
    let when = Utc
        .timestamp_opt(status.timestamp, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_default();
    format!(
        "US market: {} ({}) {}",
        if status.is_open { "open" } else { "closed" },
        serde_json::to_value(status.session)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default(),
        when
    )
}

pub fn board(view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", status_line(&view.heatmap.market_status));
    if view.stale {
        let saved = view
            .saved_at
            .and_then(|t| Utc.timestamp_opt(t, 0).single())
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let _ = writeln!(out, "Showing cached data (saved {})", saved);
    }
    for failure in &view.failures {
        let _ = writeln!(out, "! {}", failure);
    }
    for group in &view.heatmap.groups {
        let _ = writeln!(
            out,
            "\n{} (avg {}, value {})",
            group.sector_name,
            percent(group.avg_change_percent),
            money(Some(group.market_value))
        );
        if group.tiles.is_empty() {
            let _ = writeln!(out, "  (no tickers)");
        }
        for tile in &group.tiles {
            let _ = writeln!(out, "{}", tile_line(tile));
        }
    }
    out
}

fn bucket(out: &mut String, title: &str, signals: &[Signal]) {
    if signals.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}:", title);
    for s in signals {
        let _ = writeln!(out, "  {:<6} {}", s.symbol, s.message);
    }
}

pub fn copilot(report: &AdvisorReport) -> String {
    if report.is_empty() {
        return "No signals right now.\n".to_string();
    }
    let mut out = String::new();
    bucket(&mut out, "Sell", &report.sell);
    bucket(&mut out, "Buy", &report.buy);
    bucket(&mut out, "Hold", &report.hold);
    bucket(&mut out, "Momentum", &report.momentum);
    bucket(&mut out, "Breakout", &report.breakout);
    out
}

pub fn search(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No matches.\n".to_string();
    }
    results
        .iter()
        .map(|r| format!("{:<8} {}\n", r.symbol, r.description))
        .collect()
}
