use std::collections::BTreeMap;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use super::heatmap_model::{
    classify_change, HeatmapBoard, HeatmapTile, Holding, RangeMarker, SectorGroup,
};
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::quotes::{QuoteBoard, QuotePayload};
use crate::sectors::Sector;
use crate::tickers::TickerSummary;

fn holding_for(summary: &TickerSummary, price: Option<f64>) -> Option<Holding> {
    let quantity = summary.lots_qty?;
    let cost_basis = summary.lots_cost.unwrap_or_default();
    // Out-of-range products leave the valuation empty.
    let market_value = price
        .and_then(Decimal::from_f64)
        .and_then(|p| p.checked_mul(quantity))
        .map(|mv| mv.round_dp(DISPLAY_DECIMAL_PRECISION));
    let unrealized_gain = market_value.and_then(|mv| mv.checked_sub(cost_basis));
    let unrealized_gain_pct = unrealized_gain.and_then(|gain| {
        if cost_basis > Decimal::ZERO {
            gain.checked_div(cost_basis)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(|pct| pct.round_dp(DISPLAY_DECIMAL_PRECISION))
        } else {
            None
        }
    });
    Some(Holding {
        quantity,
        cost_basis,
        average_cost: summary.avg_cost,
        market_value,
        unrealized_gain,
        unrealized_gain_pct,
    })
}

/// Builds one tile from a ticker summary and its quote, if any.
pub fn build_tile(
    summary: &TickerSummary,
    quote: Option<&QuotePayload>,
    error: Option<&String>,
) -> HeatmapTile {
    let empty = QuotePayload::default();
    let q = quote.unwrap_or(&empty);
    HeatmapTile {
        ticker_id: summary.ticker.id,
        symbol: summary.ticker.symbol.clone(),
        company_name: summary.ticker.company_name.clone(),
        price: q.c,
        change: q.d,
        change_percent: q.dp,
        class: classify_change(q.dp),
        day_range: RangeMarker::new(q.c, q.l, q.h),
        week52_range: RangeMarker::new(q.c, q.week52_low, q.week52_high),
        holding: holding_for(summary, q.c),
        error: error.cloned(),
    }
}

/// Groups tickers into sector tiles.
///
/// Every sector appears, including ones without tickers. Groups are ordered by
/// name, case-insensitively; tiles by symbol.
pub fn build_board(
    sectors: &[Sector],
    tickers: &[TickerSummary],
    quotes: &QuoteBoard,
) -> HeatmapBoard {
    let mut groups: BTreeMap<(String, i32), SectorGroup> = BTreeMap::new();
    for sector in sectors {
        groups.insert(
            (sector.name.to_lowercase(), sector.id),
            SectorGroup {
                sector_id: sector.id,
                sector_name: sector.name.clone(),
                tiles: Vec::new(),
                market_value: Decimal::ZERO,
                avg_change_percent: None,
            },
        );
    }

    for summary in tickers {
        let key = (summary.sector_name.to_lowercase(), summary.ticker.sector_id);
        let group = groups.entry(key).or_insert_with(|| SectorGroup {
            sector_id: summary.ticker.sector_id,
            sector_name: summary.sector_name.clone(),
            tiles: Vec::new(),
            market_value: Decimal::ZERO,
            avg_change_percent: None,
        });
        let symbol = &summary.ticker.symbol;
        group.tiles.push(build_tile(
            summary,
            quotes.quotes.get(symbol),
            quotes.errors.get(symbol),
        ));
    }

    let groups = groups
        .into_values()
        .map(|mut group| {
            group.tiles.sort_by(|a, b| a.symbol.cmp(&b.symbol));
            group.market_value = group
                .tiles
                .iter()
                .filter_map(|t| t.holding.and_then(|h| h.market_value))
                .fold(Decimal::ZERO, |total, value| total.saturating_add(value));
            let changes: Vec<f64> = group
                .tiles
                .iter()
                .filter_map(|t| t.change_percent)
                .filter(|v| v.is_finite())
                .collect();
            group.avg_change_percent = if changes.is_empty() {
                None
            } else {
                let mean = changes.iter().sum::<f64>() / changes.len() as f64;
                Decimal::from_f64(mean)
                    .map(|d| d.round_dp(DISPLAY_DECIMAL_PRECISION))
                    .and_then(|d| d.to_f64())
            };
            group
        })
        .collect();

    HeatmapBoard {
        as_of: quotes.as_of,
        market_status: quotes.market_status,
        groups,
    }
}
