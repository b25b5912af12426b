//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, put};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/docs/global-structure",
            get(handlers::structure::get_global_structure),
        )
        .route("/api/docs/", get(handlers::docs::get_root_doc))
        .route("/api/docs/{*slug}", get(handlers::docs::get_doc))
        .route("/api/sidebar/state", get(handlers::sidebar::get_state))
        .route("/api/sidebar/state/{*id}", put(handlers::sidebar::put_state));

    Router::new()
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
