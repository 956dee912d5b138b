//! HTTP router setup.

use crate::handlers;
use crate::middleware::{api_key_auth, inject_request_id};
use crate::state::AppState;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create(state: Arc<AppState>) -> Router {
    let actions = Router::new()
        .route("/connect", post(handlers::connect))
        .route("/presale/start", post(handlers::start_presale))
        .route("/presale/mint", post(handlers::presale_mint))
        .route("/mint", post(handlers::public_mint))
        .route("/notice/dismiss", post(handlers::dismiss_notice))
        .route_layer(middleware::from_fn_with_state(state.clone(), api_key_auth));

    Router::new()
        .route("/api/{token_id}", get(handlers::metadata))
        .route("/", get(handlers::page))
        .route("/state", get(handlers::state))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .merge(actions)
        .layer(middleware::from_fn(inject_request_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
