//! searchplug - advertise search engine shortcuts to a browser via OpenSearch.
//!
//! Engines are read from configuration at startup, their favicons are fetched
//! and embedded, and the validated set is served read-only:
//! - `opensearch`: descriptor model, favicon resolution, registry
//! - `server`: discovery page and description document routes
//! - `config`: configuration file and environment handling

pub mod config;
pub mod opensearch;
pub mod server;
