//! Web server advertising search engines to the browser.
//!
//! Two routes:
//! - `/` lists every engine as a `<link rel="search">` tag
//! - `/descriptor/:short_name` serves one OpenSearch description document

mod handlers;
mod routes;
mod template_structs;
#[cfg(feature = "tls")]
mod tls;

pub use routes::create_router;
pub use template_structs::{render_descriptor_xml, render_discovery_page};
#[cfg(feature = "tls")]
pub use tls::{
    restricted_provider, server_config, TlsError, ALLOWED_CIPHER_SUITES, PROTOCOL_VERSIONS,
};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::config::{ServerOptions, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::opensearch::Registry;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub request_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Option<Duration>) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// Start the web server.
///
/// When `open_browser` is set the discovery page is opened once the listener
/// is accepting connections.
pub async fn serve(
    options: &ServerOptions,
    registry: Registry,
    open_browser: bool,
) -> anyhow::Result<()> {
    options.validate()?;

    let state = AppState::new(registry).with_request_timeout(options.request_timeout());
    let app = create_router(state);
    let addr = resolve_addr(&options.host, options.port).await?;
    let url = options.base_url();

    if options.tls.enabled {
        return serve_tls(options, app, addr, url, open_browser).await;
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Starting server at {}", url);

    if open_browser {
        open_in_browser(&url);
    }

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(feature = "tls")]
async fn serve_tls(
    options: &ServerOptions,
    app: axum::Router,
    addr: SocketAddr,
    url: String,
    open_browser: bool,
) -> anyhow::Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let (Some(cert_file), Some(key_file)) = (&options.tls.cert_file, &options.tls.key_file) else {
        anyhow::bail!("TLS is enabled but the certificate or key file is missing");
    };
    let config = RustlsConfig::from_config(Arc::new(server_config(cert_file, key_file)?));

    let handle = axum_server::Handle::new();
    let listening = handle.clone();
    tokio::spawn(async move {
        if listening.listening().await.is_some() {
            tracing::info!("Starting server at {}", url);
            if open_browser {
                open_in_browser(&url);
            }
        }
    });

    axum_server::bind_rustls(addr, config)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

#[cfg(not(feature = "tls"))]
async fn serve_tls(
    _options: &ServerOptions,
    _app: axum::Router,
    _addr: SocketAddr,
    _url: String,
    _open_browser: bool,
) -> anyhow::Result<()> {
    Err(crate::config::ConfigError::TlsUnavailable.into())
}

/// Resolve `host:port` to the first socket address it names.
async fn resolve_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("failed to resolve {}:{}", host, port))?
        .next()
        .with_context(|| format!("{}:{} did not resolve to any address", host, port))
}

fn open_in_browser(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!("Could not open {} in a browser: {}", url, e);
    }
}
