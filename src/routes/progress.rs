use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::pipeline::resolve::resolve_with;
use crate::routes::{parse_now, parse_selection};
use crate::state::AppState;
use crate::types::progress::{ProgressStatus, RouteProgress};
use crate::types::route::{Location, Waypoint};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/progress", get(progress))
}

#[derive(Debug, Deserialize)]
struct ProgressQuery {
    now: Option<String>,
    selection: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub status: ProgressStatus,
    pub now: i64,
    pub visited_count: usize,
    pub delivered_count: usize,
    pub current: Option<Waypoint>,
    pub path: Vec<Location>,
}

impl ProgressResponse {
    pub fn new(progress: &RouteProgress, now: i64) -> Self {
        Self {
            status: progress.status(),
            now,
            visited_count: progress.visited.len(),
            delivered_count: progress.delivered.len(),
            current: progress.current().cloned(),
            path: progress.path_locations(),
        }
    }
}

async fn progress(
    State(state): State<AppState>,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<ProgressResponse>, AppError> {
    let now = parse_now(query.now.as_deref())?;
    let selection = parse_selection(query.selection.as_deref(), state.config().current_selection)?;

    let feed = state.feed().acquire().await;
    let progress = resolve_with(feed.as_ref(), now, selection);

    tracing::info!(
        "Resolved route progress at {}: {} visited, {} delivered ({})",
        now,
        progress.visited.len(),
        progress.delivered.len(),
        selection.as_str()
    );

    Ok(Json(ProgressResponse::new(&progress, now)))
}
