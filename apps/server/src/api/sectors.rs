use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use heatmap_core::sectors::{NewSector, Sector, SectorUpdate};

async fn get_sectors(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Sector>>> {
    let sectors = state.sector_service.get_sectors()?;
    Ok(Json(sectors))
}

async fn create_sector(
    State(state): State<Arc<AppState>>,
    Json(sector): Json<NewSector>,
) -> ApiResult<(StatusCode, Json<Sector>)> {
    let s = state.sector_service.create_sector(sector).await?;
    Ok((StatusCode::CREATED, Json(s)))
}

async fn update_sector(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
    Json(mut sector): Json<SectorUpdate>,
) -> ApiResult<Json<Sector>> {
    sector.id = id;
    let s = state.sector_service.update_sector(sector).await?;
    Ok(Json(s))
}

async fn delete_sector(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.sector_service.delete_sector(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sectors", get(get_sectors).post(create_sector))
        .route("/sectors/{id}", put(update_sector).delete(delete_sector))
}
