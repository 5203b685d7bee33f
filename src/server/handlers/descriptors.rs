//! OpenSearch description document handler.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use super::super::template_structs::render_descriptor_xml;
use super::super::AppState;
use crate::opensearch::OPENSEARCH_CONTENT_TYPE;

/// Serve the description document for the engine named in the path.
pub async fn descriptor_xml(
    State(state): State<AppState>,
    Path(short_name): Path<String>,
) -> Response {
    let Some(engine) = state.registry.find_by_short_name(&short_name) else {
        tracing::debug!("No search engine named {:?}", short_name);
        return (StatusCode::NOT_FOUND, "search engine not found").into_response();
    };

    match render_descriptor_xml(engine) {
        Ok(xml) => ([(header::CONTENT_TYPE, OPENSEARCH_CONTENT_TYPE)], xml).into_response(),
        Err(e) => {
            tracing::error!("Failed to render description for {:?}: {}", short_name, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to generate XML").into_response()
        }
    }
}
