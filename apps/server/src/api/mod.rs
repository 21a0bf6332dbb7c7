use std::sync::Arc;

use crate::{config::Config, main_lib::AppState};
use anyhow::Context;
use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod dashboard;
mod lots;
mod quotes;
mod sectors;
mod settings;
mod tickers;

pub async fn healthz() -> &'static str {
    "ok"
}

/// Parses a numeric id from a query string value.
pub(crate) fn parse_id(raw: Option<&str>) -> crate::error::ApiResult<Option<i32>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| crate::error::ApiError::BadRequest("Invalid id".to_string())),
    }
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    if config.cors_allow_origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any));
    }
    let origins = config
        .cors_allow_origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin '{}'", o))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_headers(Any)
        .allow_methods(Any))
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> anyhow::Result<Router> {
    let cors = cors_layer(config)?;

    let api = Router::new()
        .route("/healthz", get(healthz))
        .merge(sectors::router())
        .merge(tickers::router())
        .merge(lots::router())
        .merge(quotes::router())
        .merge(settings::router())
        .merge(dashboard::router());

    Ok(Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(None).unwrap(), None);
        assert_eq!(parse_id(Some(" ")).unwrap(), None);
        assert_eq!(parse_id(Some("12")).unwrap(), Some(12));
        assert!(parse_id(Some("abc")).is_err());
    }
}
