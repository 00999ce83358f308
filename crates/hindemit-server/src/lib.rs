//! hindemit-server
//!
//! HTTP service behind the chat widget: proxies chat and follow-up
//! suggestion requests to the model provider and serves the widget page.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

/// Build the router with every route and layer attached.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::page::index))
        .route("/health", get(routes::health::health_check))
        .route("/api/models", get(routes::models::list_models))
        .route(
            "/api/initial-suggestions",
            get(routes::suggestions::initial_suggestions),
        )
        .route("/api/suggestions", post(routes::suggestions::suggestions))
        .route("/api/chat", post(routes::chat::chat))
        .route("/api/contact", post(routes::contact::submit_contact))
        .layer(axum_mw::from_fn(middleware::request_log::request_log))
        .layer(cors)
        .with_state(state)
}
