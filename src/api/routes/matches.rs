use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::FlattenQuery;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::draw::candidate_ids;
use crate::fetch::probe_matches;
use crate::normalize::flatten_match;

#[derive(Debug, Serialize)]
pub struct TournamentMatchesResponse {
    pub tournament: String,
    pub tournament_id: String,
    pub year: i32,
    pub matches: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct SingleMatchResponse {
    pub tournament: String,
    pub tournament_id: String,
    pub year: i32,
    pub match_id: String,
    pub match_data: Value,
}

/// A tournament reference after resolution against the registry.
struct ResolvedTournament {
    id: String,
    name: String,
    draw_size: i64,
}

async fn resolve_tournament(state: &AppState, input: &str) -> Result<ResolvedTournament, ApiError> {
    let registry = state.registry.load().await?;
    let id = registry
        .resolve(input)
        .ok_or_else(|| ApiError::NotFound("Invalid tournament ID or name".to_string()))?;

    // numeric ids unknown to the registry still resolve, without metadata
    let record = registry.get(&id);
    let name = record
        .and_then(|r| r.name.clone())
        .unwrap_or_else(|| "Unknown".to_string());
    let draw_size = record
        .and_then(|r| r.sgl_draw_size)
        .unwrap_or(state.default_draw_size);

    Ok(ResolvedTournament {
        id,
        name,
        draw_size,
    })
}

fn shape(payload: Value, flatten: bool) -> Result<Value, ApiError> {
    if !flatten {
        return Ok(payload);
    }
    serde_json::to_value(flatten_match(&payload)).map_err(|e| ApiError::Internal(e.to_string()))
}

/// Upstream sometimes answers 200 with nothing in it.
fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Every match upstream knows for a tournament edition, keyed by match id.
pub async fn tournament_matches(
    State(state): State<AppState>,
    Path((year, tournament_id)): Path<(i32, String)>,
    Query(query): Query<FlattenQuery>,
) -> Result<Json<TournamentMatchesResponse>, ApiError> {
    let tournament = resolve_tournament(&state, &tournament_id).await?;

    let ids = candidate_ids(tournament.draw_size, state.max_qualifiers);
    let found = probe_matches(
        state.upstream.as_ref(),
        year,
        &tournament.id,
        ids,
        state.fetch_concurrency,
    )
    .await;

    let mut matches = BTreeMap::new();
    for (id, payload) in found {
        matches.insert(id, shape(payload, query.flatten)?);
    }

    Ok(Json(TournamentMatchesResponse {
        tournament: tournament.name,
        tournament_id: tournament.id,
        year,
        matches,
    }))
}

pub async fn single_match(
    State(state): State<AppState>,
    Path((year, tournament_id, match_id)): Path<(i32, String, String)>,
    Query(query): Query<FlattenQuery>,
) -> Result<Json<SingleMatchResponse>, ApiError> {
    let tournament = resolve_tournament(&state, &tournament_id).await?;

    let payload = state
        .upstream
        .fetch_match(year, &tournament.id, &match_id)
        .await
        .filter(|p| !is_empty_payload(p))
        .ok_or_else(|| ApiError::NotFound("Match not found".to_string()))?;

    Ok(Json(SingleMatchResponse {
        tournament: tournament.name,
        tournament_id: tournament.id,
        year,
        match_id,
        match_data: shape(payload, query.flatten)?,
    }))
}
