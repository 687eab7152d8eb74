//! Minimal protected endpoints; any valid token is enough.

use axum::Json;
use serde_json::{json, Value};

use crate::models::auth::AuthenticatedUser;

pub async fn api_1(_user: AuthenticatedUser) -> Json<Value> {
    Json(json!({ "success": "Access granted for api-1" }))
}

pub async fn api_2(_user: AuthenticatedUser) -> Json<Value> {
    Json(json!({ "success": "Access granted for api-2" }))
}
