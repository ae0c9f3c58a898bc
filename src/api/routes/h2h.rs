use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use super::FlattenQuery;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::fetch;
use crate::normalize::flatten_h2h;

/// Head-to-head record for two player codes, raw or flattened.
pub async fn head_to_head(
    State(state): State<AppState>,
    Path((player1, player2)): Path<(String, String)>,
    Query(query): Query<FlattenQuery>,
) -> Result<Json<Value>, ApiError> {
    let raw = fetch::head_to_head(state.upstream.as_ref(), &player1, &player2).await?;

    if !query.flatten {
        return Ok(Json(raw));
    }

    serde_json::to_value(flatten_h2h(&raw))
        .map(Json)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::fetch::MockUpstream;
    use crate::registry::RegistryLoader;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn app(upstream: Arc<MockUpstream>) -> axum::Router {
        build_router(AppState {
            registry: Arc::new(RegistryLoader::new("unused.json".into())),
            upstream,
            max_qualifiers: 20,
            default_draw_size: 32,
            fetch_concurrency: 4,
        })
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn payload() -> Value {
        json!({
            "playerLeft": {"PlayerId": "DH58"},
            "playerRight": {"PlayerId": "N409"},
            "Tournaments": [
                {
                    "EventDisplayName": "Roland Garros",
                    "EventYear": 2022,
                    "Matches": [
                        {"MatchId": "ms104", "Round": {"ShortName": "QF"}, "ResultString": "62 46 62 76(4)"}
                    ]
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_h2h_raw_passthrough() {
        let upstream = Arc::new(MockUpstream::new().with_h2h("DH58", "N409", payload()));
        let (status, json) = get_json(app(upstream), "/atp/h2h/DH58/N409").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, payload());
    }

    #[tokio::test]
    async fn test_h2h_flattened() {
        let upstream = Arc::new(MockUpstream::new().with_h2h("DH58", "N409", payload()));
        let (status, json) = get_json(app(upstream), "/atp/h2h/DH58/N409?flatten=yes").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["playerLeft"]["PlayerId"], "DH58");
        assert_eq!(json["playerRight"]["PlayerId"], "N409");

        let matches = json["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["tournament"], "Roland Garros");
        assert_eq!(matches[0]["round"], "QF");
        assert_eq!(
            matches[0]["sets"][3],
            json!({"set": 4, "p1": 7, "p2": 6, "tiebreak": 4})
        );
        assert_eq!(matches[0]["upstream_sets"], Value::Null);
    }

    #[tokio::test]
    async fn test_h2h_bad_player_code() {
        let upstream = Arc::new(MockUpstream::new());
        let (status, json) = get_json(app(upstream.clone()), "/atp/h2h/DH58/N4-09").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert_eq!(upstream.call_count(), 0);
    }

    #[tokio::test]
    async fn test_h2h_not_found() {
        let upstream = Arc::new(MockUpstream::new());
        let (status, json) = get_json(app(upstream), "/atp/h2h/DH58/ZZ99").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["message"], "Head-to-head not found");
    }

    #[tokio::test]
    async fn test_h2h_upstream_error() {
        let upstream = Arc::new(MockUpstream::new().with_h2h_status(500));
        let (status, json) = get_json(app(upstream), "/atp/h2h/DH58/N409").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["message"], "Upstream ATP error (status 500)");
    }
}
