//! Health and hub statistics.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// GET /api/health — liveness plus hub counters.
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let stats = state.hub.stats();
    Json(json!({
        "status": "ok",
        "realtime": {
            "connections": stats.connections,
            "authenticated": stats.authenticated,
        },
    }))
}
