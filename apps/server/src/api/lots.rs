use std::sync::Arc;

use crate::{api::parse_id, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use heatmap_core::lots::{NewPurchaseLot, PurchaseLot, PurchaseLotUpdate};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LotQuery {
    ticker_id: Option<String>,
}

async fn get_lots(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LotQuery>,
) -> ApiResult<Json<Vec<PurchaseLot>>> {
    let ticker_id = parse_id(q.ticker_id.as_deref())?;
    let lots = state.lot_service.get_lots(ticker_id)?;
    Ok(Json(lots))
}

async fn create_lot(
    State(state): State<Arc<AppState>>,
    Json(lot): Json<NewPurchaseLot>,
) -> ApiResult<(StatusCode, Json<PurchaseLot>)> {
    let l = state.lot_service.create_lot(lot).await?;
    Ok((StatusCode::CREATED, Json(l)))
}

async fn update_lot(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
    Json(mut lot): Json<PurchaseLotUpdate>,
) -> ApiResult<Json<PurchaseLot>> {
    lot.id = id;
    let l = state.lot_service.update_lot(lot).await?;
    Ok(Json(l))
}

async fn delete_lot(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.lot_service.delete_lot(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/lots", get(get_lots).post(create_lot))
        .route("/lots/{id}", put(update_lot).delete(delete_lot))
}
