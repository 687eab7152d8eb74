use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{db::bounded, AppState};

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match bounded(state.config.store_timeout, state.users.ping()).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "db": "connected" })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error", "db": "unavailable" })),
            )
        }
    }
}
