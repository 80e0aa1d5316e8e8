use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use crate::analytics::{replay_frame, AnalyticsConfig, MatchAnalytics};
use crate::feed::MatchSnapshot;
use crate::models::MatchStatus;

/// Latest snapshot per match id. Each snapshot is replaced wholesale.
pub type MatchStore = Arc<RwLock<HashMap<String, MatchSnapshot>>>;

#[derive(Clone)]
pub struct AppState {
    pub store: MatchStore,
    pub analytics: AnalyticsConfig,
}

/// Build the Axum router for the analytics API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/matches", get(matches_handler))
        .route("/api/matches/:id/analytics", get(analytics_handler))
        .route("/api/matches/:id/replay", get(replay_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn health_handler() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchSummary {
    id: String,
    home_team_name: String,
    away_team_name: String,
    home_score: Option<u32>,
    away_score: Option<u32>,
    status: MatchStatus,
    event_count: usize,
    fetched_at: DateTime<Utc>,
}

/// GET /api/matches
async fn matches_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.read().await;
    let mut summaries: Vec<MatchSummary> = store
        .values()
        .map(|snap| MatchSummary {
            id: snap.match_id.clone(),
            home_team_name: snap.record.home_team_name.clone(),
            away_team_name: snap.record.away_team_name.clone(),
            home_score: snap.record.home_score,
            away_score: snap.record.away_score,
            status: snap.record.status.clone(),
            event_count: snap.record.events.len(),
            fetched_at: snap.fetched_at,
        })
        .collect();
    summaries.sort_by(|a, b| a.id.cmp(&b.id));
    Json(summaries)
}

async fn snapshot(state: &AppState, id: &str) -> Result<MatchSnapshot, (StatusCode, String)> {
    state
        .store
        .read()
        .await
        .get(id)
        .cloned()
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("match '{}' is not tracked", id)))
}

/// GET /api/matches/:id/analytics
async fn analytics_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let snap = snapshot(&state, &id).await?;
    Ok(Json(MatchAnalytics::compute(&snap.record, state.analytics)))
}

#[derive(Debug, Deserialize)]
struct ReplayParams {
    minute: Option<i64>,
}

/// GET /api/matches/:id/replay?minute=N
async fn replay_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<ReplayParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let snap = snapshot(&state, &id).await?;
    let match_length = state.analytics.match_length;
    let cursor = params.minute.unwrap_or(match_length as i64);
    Ok(Json(replay_frame(&snap.record, cursor, match_length)))
}
