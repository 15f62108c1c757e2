//! Pre-hackathon registration backend
//!
//! Public team registration plus an authenticated admin dashboard API
//! (check-in, room and board allocation, filtered views, CSV exports),
//! backed by SQLite.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod maintenance;
pub mod models;
pub mod roster;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Session store for the auth layer
    let sessions = state.repo.clone();

    let admin_routes = Router::new()
        // Registrations
        .route("/registrations", get(api::list_registrations))
        .route("/teams", post(api::register_on_spot))
        .route("/teams/swap", post(api::swap_members))
        .route("/teams/{id}/check-in", put(api::check_in_team))
        .route("/teams/{id}/extension-board", put(api::set_extension_board))
        .route("/teams/{id}/problem-statement", put(api::set_problem_statement))
        // Views
        .route("/people", get(api::list_people))
        .route("/stats", get(api::get_stats))
        // Exports
        .route("/export/individuals", get(api::export_individuals))
        .route("/export/teams", get(api::export_teams))
        // Maintenance
        .route("/maintenance/reconcile", post(api::run_reconcile))
        .route("/logout", post(auth::logout))
        // Apply session auth middleware to everything above
        .route_layer(middleware::from_fn(move |req, next| {
            auth::session_auth_layer(sessions.clone(), req, next)
        }))
        .route("/login", post(auth::login));

    let api_routes = Router::new()
        .route("/register", post(api::register_team))
        .nest("/admin", admin_routes);

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
