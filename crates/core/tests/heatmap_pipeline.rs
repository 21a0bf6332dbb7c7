//! End-to-end checks of the pure pipeline: quote board -> heatmap -> advice.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, TimeZone, Utc};
use heatmap_core::advisor::AdvisorThresholds;
use heatmap_core::dashboard::advise_board;
use heatmap_core::demo::{DEMO_QUOTES, DEMO_TICKERS};
use heatmap_core::heatmap::{build_board, TileClass};
use heatmap_core::market_status::compute_us_market_status;
use heatmap_core::quotes::{QuoteBoard, QuotePayload};
use heatmap_core::sectors::Sector;
use heatmap_core::tickers::{Ticker, TickerSummary};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn demo_inputs() -> (Vec<Sector>, Vec<TickerSummary>, QuoteBoard) {
    let mut sectors: Vec<Sector> = Vec::new();
    let mut summaries = Vec::new();
    for (i, (symbol, company, sector_name)) in DEMO_TICKERS.iter().enumerate() {
        let sector_id = match sectors.iter().find(|s| s.name == *sector_name) {
            Some(s) => s.id,
            None => {
                let id = sectors.len() as i32 + 1;
                sectors.push(Sector {
                    id,
                    name: sector_name.to_string(),
                    created_at: NaiveDateTime::default(),
                });
                id
            }
        };
        let lots: Option<(Decimal, Decimal)> = match *symbol {
            "AAPL" => Some((dec!(15), dec!(2325))),
            "TSLA" => Some((dec!(1.2), dec!(840))),
            _ => None,
        };
        summaries.push(TickerSummary {
            ticker: Ticker {
                id: i as i32 + 100,
                symbol: symbol.to_string(),
                company_name: company.to_string(),
                sector_id,
                security_type: "Common Stock".to_string(),
                created_at: NaiveDateTime::default(),
            },
            sector_name: sector_name.to_string(),
            lots_qty: lots.map(|(q, _)| q),
            lots_cost: lots.map(|(_, c)| c),
            avg_cost: lots.map(|(q, c)| c / q),
        });
    }

    let now = Utc.with_ymd_and_hms(2024, 3, 13, 15, 0, 0).unwrap();
    let quotes: BTreeMap<String, QuotePayload> = DEMO_QUOTES
        .iter()
        .map(|(s, c, pc, h, l)| (s.to_string(), QuotePayload::from_prices(*c, *pc, *h, *l, now.timestamp())))
        .collect();
    let board = QuoteBoard {
        as_of: now.timestamp(),
        market_status: compute_us_market_status(now),
        quotes,
        errors: BTreeMap::new(),
    };
    (sectors, summaries, board)
}

#[test]
fn demo_board_groups_every_sector() {
    let (sectors, tickers, quotes) = demo_inputs();
    let board = build_board(&sectors, &tickers, &quotes);

    assert_eq!(board.groups.len(), 10);
    assert_eq!(board.groups[0].sector_name, "Communication Services");
    let tile_count: usize = board.groups.iter().map(|g| g.tiles.len()).sum();
    assert_eq!(tile_count, 24);
    assert!(board.market_status.is_open);

    let tiles: Vec<_> = board.groups.iter().flat_map(|g| g.tiles.iter()).collect();
    let class_of = |sym: &str| tiles.iter().find(|t| t.symbol == sym).unwrap().class;
    assert_eq!(class_of("AAPL"), TileClass::Gain);
    assert_eq!(class_of("GOOGL"), TileClass::Loss);
    assert_eq!(class_of("JPM"), TileClass::Gain);
    assert_eq!(class_of("BAC"), TileClass::NoData);
}

#[test]
fn demo_board_advice() {
    let (sectors, tickers, quotes) = demo_inputs();
    let board = build_board(&sectors, &tickers, &quotes);
    let report = advise_board(&board, &AdvisorThresholds::default());

    // AAPL: +17.5% on cost, green day, no 52w data -> hold
    assert!(report.hold.iter().any(|s| s.symbol == "AAPL"));
    // TSLA: -74.5% on cost but no 52w data -> hold
    assert!(report.hold.iter().any(|s| s.symbol == "TSLA"));
    assert!(report.sell.is_empty());
    assert!(report.buy.is_empty());
    // Nothing in the demo set is up 2% on the day
    assert!(report.momentum.is_empty());
}
