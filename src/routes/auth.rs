use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    error::AppError,
    models::user::{InsertAck, LoginRequest, SignupRequest, User},
    services::auth::AuthService,
    AppState,
};

/// Body rejections (bad JSON, missing fields, unknown role) surface as 400s.
fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(b)| b)
        .map_err(|e| AppError::Validation(e.body_text()))
}

pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<InsertAck>, AppError> {
    let body = parse_body(body)?;
    AuthService::signup(state.users.as_ref(), &state.config, body)
        .await
        .map(Json)
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let body = parse_body(body)?;
    AuthService::login(state.users.as_ref(), &state.config, body)
        .await
        .map(Json)
}
