//! Discovery page handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::super::template_structs::render_discovery_page;
use super::super::AppState;

/// Serve the page whose `<link rel="search">` tags advertise every engine.
pub async fn discovery_page(State(state): State<AppState>) -> Response {
    match render_discovery_page(&state.registry) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render discovery page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render page").into_response()
        }
    }
}
