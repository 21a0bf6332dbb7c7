use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::advisor::{advise, AdvisorInput, AdvisorReport, AdvisorThresholds};
use crate::errors::Result;
use crate::heatmap::{build_board, HeatmapBoard};
use crate::quotes::QuoteServiceTrait;
use crate::sectors::SectorServiceTrait;
use crate::tickers::TickerServiceTrait;

/// Heatmap and copilot advice built from the same quote refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub heatmap: HeatmapBoard,
    pub advice: AdvisorReport,
}

/// Advisor report over every tile of a board.
pub fn advise_board(board: &HeatmapBoard, thresholds: &AdvisorThresholds) -> AdvisorReport {
    let inputs: Vec<AdvisorInput> = board
        .groups
        .iter()
        .flat_map(|g| g.tiles.iter())
        .map(AdvisorInput::from)
        .collect();
    advise(&inputs, thresholds)
}

#[async_trait]
pub trait DashboardServiceTrait: Send + Sync {
    /// Refreshes quotes for every ticker and builds the heatmap.
    async fn heatmap(&self) -> Result<HeatmapBoard>;

    async fn dashboard(&self) -> Result<DashboardView>;

    fn thresholds(&self) -> AdvisorThresholds;
}

pub struct DashboardService {
    sector_service: Arc<dyn SectorServiceTrait>,
    ticker_service: Arc<dyn TickerServiceTrait>,
    quote_service: Arc<dyn QuoteServiceTrait>,
    thresholds: AdvisorThresholds,
}

impl DashboardService {
    pub fn new(
        sector_service: Arc<dyn SectorServiceTrait>,
        ticker_service: Arc<dyn TickerServiceTrait>,
        quote_service: Arc<dyn QuoteServiceTrait>,
        thresholds: AdvisorThresholds,
    ) -> Self {
        Self {
            sector_service,
            ticker_service,
            quote_service,
            thresholds,
        }
    }
}

#[async_trait]
impl DashboardServiceTrait for DashboardService {
    async fn heatmap(&self) -> Result<HeatmapBoard> {
        let sectors = self.sector_service.get_sectors()?;
        let tickers = self.ticker_service.get_tickers()?;
        let symbols = tickers.iter().map(|t| t.ticker.symbol.clone()).collect();
        let quotes = self.quote_service.refresh_quotes(symbols).await?;
        debug!(
            "Heatmap over {} sectors, {} tickers, {} quote errors",
            sectors.len(),
            tickers.len(),
            quotes.errors.len()
        );
        Ok(build_board(&sectors, &tickers, &quotes))
    }

    async fn dashboard(&self) -> Result<DashboardView> {
        let heatmap = self.heatmap().await?;
        let advice = advise_board(&heatmap, &self.thresholds);
        Ok(DashboardView { heatmap, advice })
    }

    fn thresholds(&self) -> AdvisorThresholds {
        self.thresholds
    }
}
