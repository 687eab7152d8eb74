pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::UserStore;
use middleware::auth::TOKEN_HEADER;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, config: Config) -> Self {
        Self {
            users,
            config: Arc::new(config),
        }
    }
}

/// Builds the HTTP router. Everything except signup, login and health sits
/// behind the access guard.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/users", get(routes::users::list_users))
        .route("/users/{user_id}", get(routes::users::get_user))
        .route("/api-1", get(routes::probe::api_1))
        .route("/api-2", get(routes::probe::api_2))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(TOKEN_HEADER),
        ])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/users/signup", post(routes::auth::signup))
        .route("/users/login", post(routes::auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
