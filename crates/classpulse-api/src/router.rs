//! Route definitions for the ClassPulse HTTP API.
//!
//! All REST routes are organized by domain and mounted under `/api`; the
//! WebSocket upgrade lives at `/ws`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(poll_routes())
        .merge(note_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    let cors = build_cors_layer(&state);
    let max_body = state.config.server.max_body_bytes;

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Poll lifecycle endpoints.
fn poll_routes() -> Router<AppState> {
    Router::new()
        .route("/polls", post(handlers::poll::create_poll))
        .route("/polls", get(handlers::poll::list_polls))
        .route("/polls/{id}", get(handlers::poll::get_poll))
        .route("/polls/{id}/votes", post(handlers::poll::vote))
        .route("/polls/{id}/close", post(handlers::poll::close_poll))
        .route("/polls/{id}/results", get(handlers::poll::results))
        .route("/polls/{id}/related", get(handlers::poll::related_content))
}

/// Note session endpoints.
fn note_routes() -> Router<AppState> {
    Router::new()
        .route("/notes", post(handlers::note::create_session))
        .route("/notes", get(handlers::note::list_sessions))
        .route("/notes/{id}", get(handlers::note::get_session))
        .route("/notes/{id}", delete(handlers::note::delete_session))
        .route("/notes/{id}/status", put(handlers::note::update_status))
        .route(
            "/notes/{id}/contributions",
            post(handlers::note::add_contribution),
        )
        .route(
            "/notes/{id}/contributions",
            get(handlers::note::list_contributions),
        )
}

/// Health endpoints.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// CORS layer from configuration.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.config.server.cors.allowed_origins;
    if origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
