//! Relation set submission routes.

#[cfg(test)]
#[path = "relations_test.rs"]
mod relations_test;

use axum::extract::State;
use axum::response::Json;
use canvas::adjacency::Relation;
use canvas::relations::RelationPayload;
use tracing::{info, warn};

use crate::state::{AppState, Latest};

/// `POST /api/post_data`: store a submitted relation set and echo its items.
///
/// Items that are not `"source, target"` strings are still stored and echoed.
pub async fn post_data(State(state): State<AppState>, Json(payload): Json<RelationPayload>) -> Json<Vec<String>> {
    for item in &payload.items {
        match item.parse::<Relation>() {
            Ok(relation) => info!(source = %relation.source, target = %relation.target, "relation"),
            Err(e) => warn!(error = %e, "malformed relation item"),
        }
    }

    let mut latest = state.latest.write().await;
    latest.record(payload.items.clone());
    info!(items = payload.items.len(), submission = latest.submissions, "relation set received");

    Json(payload.items)
}

/// `GET /api/relations`: the most recent submission.
pub async fn latest(State(state): State<AppState>) -> Json<Latest> {
    Json(state.latest.read().await.clone())
}
