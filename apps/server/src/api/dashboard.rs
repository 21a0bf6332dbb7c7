use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{extract::State, routing::get, Json, Router};
use heatmap_core::advisor::{AdvisorReport, AdvisorThresholds};
use heatmap_core::heatmap::HeatmapBoard;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CopilotResponse {
    market_status: heatmap_core::market_status::MarketStatus,
    advice: AdvisorReport,
    thresholds: AdvisorThresholds,
}

async fn get_heatmap(State(state): State<Arc<AppState>>) -> ApiResult<Json<HeatmapBoard>> {
    let board = state.dashboard_service.heatmap().await?;
    Ok(Json(board))
}

async fn get_copilot(State(state): State<Arc<AppState>>) -> ApiResult<Json<CopilotResponse>> {
    let view = state.dashboard_service.dashboard().await?;
    Ok(Json(CopilotResponse {
        market_status: view.heatmap.market_status,
        advice: view.advice,
        thresholds: state.dashboard_service.thresholds(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/heatmap", get(get_heatmap))
        .route("/copilot", get(get_copilot))
}
