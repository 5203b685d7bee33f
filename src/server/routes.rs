//! Router configuration for the web server.

use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;
    let router = Router::new()
        .route("/", get(handlers::discovery_page))
        .route("/descriptor/:short_name", get(handlers::descriptor_xml));

    with_layers(router, request_timeout).with_state(state)
}

/// Wrap `router` in request tracing and, when set, a per-request timeout
/// answered with 408.
fn with_layers<S>(router: Router<S>, request_timeout: Option<Duration>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let router = match request_timeout {
        Some(timeout) => router.layer(TimeoutLayer::new(timeout)),
        None => router,
    };
    router.layer(TraceLayer::new_for_http())
}
