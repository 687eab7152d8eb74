use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::{
    db::bounded,
    error::AppError,
    middleware::authorization::{check_user_type, match_user_type_to_uid},
    models::auth::AuthenticatedUser,
    models::user::{ListUsersQuery, User, UserPage, UserRole},
    AppState,
};

/// List users page by page. Admin only.
///
/// The role check runs before the query string is looked at.
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<Json<UserPage>, AppError> {
    check_user_type(&user, UserRole::Admin)?;

    let Query(params) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let (start_index, record_per_page) = params.window();
    let page = bounded(
        state.config.store_timeout,
        state.users.list(start_index, record_per_page),
    )
    .await?;

    Ok(Json(page))
}

/// Fetch a single user. Users may only read themselves; admins read anyone.
pub async fn get_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, AppError> {
    let Path(user_id) = path.map_err(|e| AppError::Validation(e.body_text()))?;
    tracing::debug!(caller = %user.uid, role = %user.user_type, target = %user_id, "get_user");
    match_user_type_to_uid(&user, &user_id, UserRole::Admin)?;

    let found = bounded(state.config.store_timeout, state.users.find_by_id(&user_id))
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(found))
}
