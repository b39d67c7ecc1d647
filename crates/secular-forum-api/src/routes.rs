use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use secular_forum_core::{
    build_narrative_river, build_river_links, NarrativeNode, OutlookError, OutlookRecord,
    RiverLink,
};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::task::JoinError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/outlooks", get(outlooks))
        .route("/api/narrative-river", get(narrative_river))
        .route("/api/narrative-river/links", get(narrative_links))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Load(#[from] OutlookError),

    #[error("outlook load task failed: {0}")]
    Task(#[from] JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("failed to load outlooks: {self}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": self.to_string() })),
        )
            .into_response()
    }
}

/// Runs the first spreadsheet read on the blocking pool; later calls hit the cache.
async fn ensure_loaded(state: &AppState) -> Result<(), ApiError> {
    if state.loader().is_loaded() {
        return Ok(());
    }
    let loader = state.shared_loader();
    tokio::task::spawn_blocking(move || loader.load().map(|_| ())).await??;
    Ok(())
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Secular Forum API is running", "status": "ok" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn outlooks(State(state): State<AppState>) -> Result<Json<Vec<OutlookRecord>>, ApiError> {
    ensure_loaded(&state).await?;
    let records = state.loader().load()?;
    Ok(Json(records.to_vec()))
}

async fn narrative_river(
    State(state): State<AppState>,
) -> Result<Json<Vec<NarrativeNode>>, ApiError> {
    ensure_loaded(&state).await?;
    let records = state.loader().load()?;
    Ok(Json(build_narrative_river(records)))
}

async fn narrative_links(State(state): State<AppState>) -> Result<Json<Vec<RiverLink>>, ApiError> {
    ensure_loaded(&state).await?;
    let records = state.loader().load()?;
    let nodes = build_narrative_river(records);
    Ok(Json(build_river_links(&nodes)))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use secular_forum_core::{OutlookLoader, OutlookRecord};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::router;
    use crate::state::AppState;

    fn record(year: i64, theme: &str, rank: Option<i64>) -> OutlookRecord {
        OutlookRecord {
            theme: Some(theme.to_string()),
            rank,
            year: Some(year),
            ..OutlookRecord::default()
        }
    }

    fn sample_state() -> AppState {
        AppState::new(OutlookLoader::from_records(
            "memory.csv",
            vec![
                record(2023, "Base Case Soft Landing", Some(1)),
                record(2023, "Inflation", Some(2)),
                record(2024, "Base Case Growth", Some(1)),
                record(2024, "Inflation", Some(3)),
            ],
        ))
    }

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_and_root_respond() {
        let (status, body) = get_json(sample_state(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "healthy" }));

        let (status, body) = get_json(sample_state(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn outlooks_returns_records_with_spreadsheet_keys() {
        let (status, body) = get_json(sample_state(), "/api/outlooks").await;
        assert_eq!(status, StatusCode::OK);

        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["Theme"], "Base Case Soft Landing");
        assert_eq!(rows[0]["Year"], 2023);
        assert!(rows[0]["Institution"].is_null());
    }

    #[tokio::test]
    async fn narrative_river_returns_nodes() {
        let (status, body) = get_json(sample_state(), "/api/narrative-river").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {
                    "id": "2023-base",
                    "year": 2023,
                    "name": "Global Outlook",
                    "rank": 0,
                    "type": "base"
                },
                {
                    "id": "2023-inflation",
                    "year": 2023,
                    "name": "Inflation",
                    "rank": 1,
                    "type": "theme"
                },
                {
                    "id": "2024-base",
                    "year": 2024,
                    "name": "Global Outlook",
                    "rank": 0,
                    "type": "base"
                },
                {
                    "id": "2024-inflation",
                    "year": 2024,
                    "name": "Inflation",
                    "rank": 1,
                    "type": "theme"
                }
            ])
        );
    }

    #[tokio::test]
    async fn narrative_links_connect_consecutive_years() {
        let (status, body) = get_json(sample_state(), "/api/narrative-river/links").await;
        assert_eq!(status, StatusCode::OK);

        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|link| link["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["2023-base-2024-base", "2023-inflation-2024-inflation"]);
    }

    #[tokio::test]
    async fn missing_data_file_is_a_server_error() {
        let state = AppState::new(OutlookLoader::new("/definitely/not/here/outlooks.csv"));

        let (status, body) = get_json(state.clone(), "/api/narrative-river").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .contains("data file not found"));

        let (status, _) = get_json(state.clone(), "/api/outlooks").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!state.loader().is_loaded());
    }

    #[tokio::test]
    async fn first_request_reads_spreadsheet_from_disk() {
        let fixture = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../secular-forum-core/tests/data/outlooks.csv");
        let state = AppState::new(OutlookLoader::new(fixture));
        assert!(!state.loader().is_loaded());

        let (status, body) = get_json(state.clone(), "/api/outlooks").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 10);
        assert!(state.loader().is_loaded());

        let (status, body) = get_json(state, "/api/narrative-river").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], "2023-base");
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let response = router(sample_state())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&header::HeaderValue::from_static("*"))
        );
    }
}
