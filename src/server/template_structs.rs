//! Askama template structs for the discovery page and description documents.
//!
//! Each struct corresponds to a template in the templates/ directory.
//! Askama provides compile-time verification that templates are valid.

use askama::Template;

use crate::opensearch::{Registry, SearchDescriptor};

/// Title of the discovery page.
pub const DISCOVERY_TITLE: &str = "searchplug";

/// Helper struct for one engine on the discovery page.
pub struct EngineLink {
    pub name: String,
    /// Short name, percent-encoded for use as a path segment.
    pub href: String,
    pub icon: String,
    pub width: u32,
    pub height: u32,
}

impl EngineLink {
    pub fn from_descriptor(descriptor: &SearchDescriptor) -> Self {
        Self {
            name: descriptor.display_name().to_string(),
            href: urlencoding::encode(&descriptor.short_name).into_owned(),
            icon: descriptor.image.data.clone(),
            width: descriptor.image.width,
            height: descriptor.image.height,
        }
    }
}

/// Page whose `<link rel="search">` tags let the browser discover every engine.
#[derive(Template)]
#[template(path = "discovery.html")]
pub struct DiscoveryTemplate<'a> {
    pub title: &'a str,
    pub engines: Vec<EngineLink>,
}

/// OpenSearch 1.1 description document for a single engine.
#[derive(Template)]
#[template(path = "opensearch.xml")]
pub struct OpenSearchTemplate<'a> {
    pub engine: &'a SearchDescriptor,
    pub tags: String,
}

/// Render the discovery page listing every engine in registry order.
pub fn render_discovery_page(registry: &Registry) -> askama::Result<String> {
    DiscoveryTemplate {
        title: DISCOVERY_TITLE,
        engines: registry.iter().map(EngineLink::from_descriptor).collect(),
    }
    .render()
}

/// Render the description document for one engine.
pub fn render_descriptor_xml(descriptor: &SearchDescriptor) -> askama::Result<String> {
    OpenSearchTemplate {
        engine: descriptor,
        tags: descriptor.joined_tags(),
    }
    .render()
}
