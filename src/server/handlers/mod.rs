//! HTTP request handlers for the web server.

mod descriptors;
mod discovery;

// Re-export handlers for use by the router
pub use descriptors::descriptor_xml;
pub use discovery::discovery_page;
