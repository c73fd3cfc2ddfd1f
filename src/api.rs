// src/api.rs
//
// Read-only JSON surface over one shared ContentQuery. This is the data
// API a rendering layer consumes: list pages, detail pages, and the
// identifier enumeration used to precompute detail-page addresses.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::query::types::{QueryOutcome, Record, RecordId, SourceFailure};
use crate::query::{ContentQuery, DEFAULT_LATEST_COUNT};

#[derive(Clone)]
pub struct AppState {
    pub query: Arc<ContentQuery>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/posts", get(list_posts))
        .route("/posts/ids", get(list_ids))
        .route("/posts/latest", get(list_latest))
        .route("/posts/{id}", get(get_post))
        .route("/categories/{id}/posts", get(list_category))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Listing response. `records` empty with `failed_sources` non-empty means
/// "sources unavailable", which callers must not confuse with an empty
/// collection.
#[derive(serde::Serialize)]
struct ListResp {
    records: Vec<Record>,
    degraded: bool,
    failed_sources: Vec<SourceFailure>,
}

impl ListResp {
    fn from_outcome(out: QueryOutcome<Vec<Record>>) -> Self {
        Self {
            degraded: out.is_degraded(),
            records: out.value,
            failed_sources: out.failures,
        }
    }
}

#[derive(serde::Serialize)]
struct IdsResp {
    ids: Vec<RecordId>,
    degraded: bool,
    failed_sources: Vec<SourceFailure>,
}

fn internal(e: anyhow::Error) -> StatusCode {
    tracing::error!(error = ?e, "query failed");
    StatusCode::BAD_GATEWAY
}

async fn list_posts(State(state): State<AppState>) -> Result<Json<ListResp>, StatusCode> {
    let out = state.query.list_sorted().await.map_err(internal)?;
    Ok(Json(ListResp::from_outcome(out)))
}

async fn list_ids(State(state): State<AppState>) -> Result<Json<IdsResp>, StatusCode> {
    let out = state.query.list_identifiers().await.map_err(internal)?;
    Ok(Json(IdsResp {
        degraded: out.is_degraded(),
        ids: out.value,
        failed_sources: out.failures,
    }))
}

#[derive(serde::Deserialize)]
struct LatestParams {
    count: Option<usize>,
}

async fn list_latest(
    State(state): State<AppState>,
    Query(params): Query<LatestParams>,
) -> Result<Json<ListResp>, StatusCode> {
    let count = params.count.unwrap_or(DEFAULT_LATEST_COUNT);
    let out = state.query.list_latest(count).await.map_err(internal)?;
    Ok(Json(ListResp::from_outcome(out)))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record>, StatusCode> {
    let out = state.query.get_by_id(&id).await.map_err(internal)?;
    match out.value {
        Some(rec) => Ok(Json(rec)),
        // Not-found is an absence, surfaced as HTTP absence.
        None => Err(StatusCode::NOT_FOUND),
    }
}

async fn list_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ListResp>, StatusCode> {
    let out = state.query.list_by_category(id).await.map_err(internal)?;
    Ok(Json(ListResp::from_outcome(out)))
}
