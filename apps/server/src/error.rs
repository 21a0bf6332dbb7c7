use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use heatmap_core::errors::{DatabaseError, Error as CoreError, ValidationError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, String, Option<BTreeMap<String, Vec<String>>>) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST".into(), None),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND".into(), None),
            ApiError::Anyhow(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR".into(),
                None,
            ),
            ApiError::Core(err) => core_parts(err),
        }
    }
}

fn core_parts(err: &CoreError) -> (StatusCode, String, Option<BTreeMap<String, Vec<String>>>) {
    match err {
        CoreError::Validation(ValidationError::Field { field, message }) => {
            let mut errors = BTreeMap::new();
            errors.insert(field.clone(), vec![message.clone()]);
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR".into(), Some(errors))
        }
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR".into(), None),
        CoreError::NotFound(_) | CoreError::Database(DatabaseError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, "NOT_FOUND".into(), None)
        }
        CoreError::ConstraintViolation(_)
        | CoreError::Database(DatabaseError::UniqueViolation(_))
        | CoreError::Database(DatabaseError::ForeignKeyViolation(_)) => {
            (StatusCode::CONFLICT, "CONFLICT".into(), None)
        }
        CoreError::MarketData(e) => (StatusCode::BAD_GATEWAY, e.code().into(), None),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR".into(),
            None,
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, errors) = self.parts();
        if status.is_server_error() {
            tracing::error!("{} {}: {}", status.as_u16(), code, self);
        } else {
            tracing::debug!("{} {}: {}", status.as_u16(), code, self);
        }
        let body = Json(ErrorBody {
            code,
            message: self.to_string(),
            errors,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
