use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{extract::State, routing::get, Json, Router};
use heatmap_core::settings::{SiteConfigUpdate, SiteConfigView};

async fn get_config(State(state): State<Arc<AppState>>) -> ApiResult<Json<SiteConfigView>> {
    let view = state.settings_service.get_config_view()?;
    Ok(Json(view))
}

/// Stores the provider key and reconfigures the live provider with whichever
/// key is now in effect.
async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SiteConfigUpdate>,
) -> ApiResult<Json<SiteConfigView>> {
    let view = state.settings_service.update_api_key(update).await?;
    let effective = state.settings_service.effective_api_key()?;
    state.quote_service.set_api_key(effective).await;
    Ok(Json(view))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/config", get(get_config).put(update_config))
}
