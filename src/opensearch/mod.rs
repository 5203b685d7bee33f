//! OpenSearch description documents.
//!
//! - `descriptor`: the protocol model and its validation rules
//! - `favicon`: icon lookup and data-URL embedding
//! - `registry`: the ordered set of engines served to the browser

mod descriptor;
mod favicon;
mod registry;

pub use descriptor::{
    Candidate, Image, QueryUrl, SearchDescriptor, ValidationError, MAX_DESCRIPTION,
    MAX_DEVELOPER, MAX_LONG_NAME, MAX_TAGS, SEARCH_TERMS_PLACEHOLDER,
};
pub use favicon::{
    data_url, icon_domain, FaviconError, FaviconOptions, FaviconResolver, DEFAULT_ICON_MIME,
    DEFAULT_ICON_SERVICE,
};
pub use registry::{validate_all, Registry, RegistryError};

use serde::{Deserialize, Serialize};

/// OpenSearch 1.1 XML namespace.
pub const OPENSEARCH_NS: &str = "http://a9.com/-/spec/opensearch/1.1/";
/// Mozilla's browser search extension namespace.
pub const MOZILLA_NS: &str = "http://www.mozilla.org/2006/browser/search/";
/// Content type of a served description document.
pub const OPENSEARCH_CONTENT_TYPE: &str = "application/opensearchdescription+xml";

/// A configured engine: the published descriptor plus how to source its icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(flatten)]
    pub descriptor: SearchDescriptor,
    #[serde(default)]
    pub favicon: FaviconOptions,
}

impl EngineConfig {
    pub fn new(descriptor: SearchDescriptor, favicon: FaviconOptions) -> Self {
        Self {
            descriptor,
            favicon,
        }
    }
}

/// The engine list used when no configuration file provides one.
pub fn default_engines() -> Vec<EngineConfig> {
    let mut descriptor = SearchDescriptor::new(
        "Search Go packages",
        QueryUrl::new("https://pkg.go.dev/search?q={searchTerms}"),
    );
    descriptor.description = "Search Go packages on pkg.go.dev".to_string();
    descriptor.tags = vec!["golang".to_string(), "go".to_string(), "packages".to_string()];
    descriptor.image = Image::sized(16, 16);

    vec![EngineConfig::new(
        descriptor,
        FaviconOptions::with_domain("go.dev"),
    )]
}
