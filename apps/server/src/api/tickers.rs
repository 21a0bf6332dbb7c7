use std::sync::Arc;

use crate::{api::parse_id, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use heatmap_core::tickers::{NewTicker, Ticker, TickerSummary, TickerUpdate};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TickerQuery {
    id: Option<String>,
}

/// Every ticker with its sector name and lot totals. `?id=` narrows the list
/// to that ticker; an unknown id yields an empty list.
async fn get_tickers(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TickerQuery>,
) -> ApiResult<Json<Vec<TickerSummary>>> {
    let tickers = match parse_id(q.id.as_deref())? {
        None => state.ticker_service.get_tickers()?,
        Some(id) => match state.ticker_service.get_ticker(id) {
            Ok(summary) => vec![summary],
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e.into()),
        },
    };
    Ok(Json(tickers))
}

async fn create_ticker(
    State(state): State<Arc<AppState>>,
    Json(ticker): Json<NewTicker>,
) -> ApiResult<(StatusCode, Json<Ticker>)> {
    let t = state.ticker_service.create_ticker(ticker).await?;
    Ok((StatusCode::CREATED, Json(t)))
}

async fn update_ticker(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
    Json(mut ticker): Json<TickerUpdate>,
) -> ApiResult<Json<Ticker>> {
    ticker.id = id;
    let t = state.ticker_service.update_ticker(ticker).await?;
    Ok(Json(t))
}

async fn delete_ticker(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.ticker_service.delete_ticker(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tickers", get(get_tickers).post(create_ticker))
        .route("/tickers/{id}", put(update_ticker).delete(delete_ticker))
}
