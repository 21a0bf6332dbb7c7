use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use heatmap_core::market_status::MarketStatus;
use heatmap_core::quotes::QuoteBoard;
use heatmap_market_data::{CompanyProfile, SearchResult};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct QuotesRequest {
    #[serde(default)]
    symbols: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Quotes for every tracked ticker.
async fn get_quotes(State(state): State<Arc<AppState>>) -> ApiResult<Json<QuoteBoard>> {
    let board = state.quote_service.refresh_quotes(Vec::new()).await?;
    Ok(Json(board))
}

/// Quotes for the requested symbols. An empty list means every tracked ticker.
async fn post_quotes(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QuotesRequest>,
) -> ApiResult<Json<QuoteBoard>> {
    let board = state.quote_service.refresh_quotes(body.symbols).await?;
    Ok(Json(board))
}

async fn search_symbols(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> ApiResult<Json<Vec<SearchResult>>> {
    let results = state.quote_service.search_symbols(&q.q).await?;
    Ok(Json(results))
}

async fn get_profile(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CompanyProfile>> {
    let profile = state.quote_service.get_profile(&symbol).await?;
    Ok(Json(profile))
}

async fn market_status(State(state): State<Arc<AppState>>) -> Json<MarketStatus> {
    Json(state.quote_service.market_status())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quotes", get(get_quotes).post(post_quotes))
        .route("/search", get(search_symbols))
        .route("/market-status", get(market_status))
        .route("/profile/{symbol}", get(get_profile))
}
