use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError, models::auth::AuthenticatedUser, services::tokens::validate_token, AppState,
};

/// Request header carrying the access token.
pub const TOKEN_HEADER: &str = "token";

/// Access guard for protected routes.
///
/// Rejects the request before any handler runs when the `token` header is
/// missing or fails verification; otherwise stores the caller's identity in
/// the request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::MissingToken)?;

    let claims = validate_token(token, &state.config.secret_key).map_err(|e| {
        tracing::debug!("token rejected: {e}");
        AppError::InvalidToken(e.to_string())
    })?;

    req.extensions_mut().insert(AuthenticatedUser::from(claims));
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::MissingToken)
    }
}
