//! Dashboard module - heatmap and copilot advice over the tracked tickers.

mod dashboard_service;

pub use dashboard_service::{advise_board, DashboardService, DashboardServiceTrait, DashboardView};
