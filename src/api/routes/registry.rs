use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::api::state::AppState;
use crate::api::ApiError;

/// The registry file exactly as stored. Read fresh on every call so offline
/// rebuilds show up without a restart.
pub async fn get_registry(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let raw = state.registry.read_raw().await?;
    Ok(Json(raw))
}
