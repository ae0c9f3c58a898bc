//! REST API endpoints.
//!
//! Axum-based HTTP API exposing the tournament registry, per-tournament match
//! lookups and head-to-head records, each raw or flattened.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use crate::fetch::FetchError;
use crate::registry::RegistryError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "BAD_GATEWAY"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        error!("Registry unavailable: {}", err);
        ApiError::Internal(err.to_string())
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::InvalidPlayerCode(_) => ApiError::BadRequest(
                "Player IDs must be alphanumeric ATP player codes (e.g., DH58)".to_string(),
            ),
            FetchError::NotFound(_) => ApiError::NotFound("Head-to-head not found".to_string()),
            FetchError::HttpStatus { status, .. } => {
                ApiError::BadGateway(format!("Upstream ATP error (status {})", status))
            }
            FetchError::InvalidJson { .. } => {
                ApiError::BadGateway("Upstream ATP returned invalid JSON".to_string())
            }
            FetchError::Http(_) | FetchError::InvalidUrl(_) => {
                ApiError::BadGateway("Upstream ATP request failed".to_string())
            }
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/atp/tournaments/registry", get(routes::registry::get_registry))
        .route(
            "/atp/matches/:year/:tournament_id",
            get(routes::matches::tournament_matches),
        )
        .route(
            "/atp/matches/:year/:tournament_id/:match_id",
            get(routes::matches::single_match),
        )
        .route("/atp/h2h/:player1/:player2", get(routes::h2h::head_to_head))
        .with_state(state)
}

/// CORS policy for browser clients. `*` allows any origin.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            error!("Invalid CORS origin {:?}, allowing any origin", origin);
            layer.allow_origin(Any)
        }
    }
}
