//! Favicon lookup and embedding.
//!
//! Icons are fetched once per engine from a public favicon service and inlined
//! into the descriptor as a base64 data URL, so the browser never needs a second
//! request to show the engine's icon.

use std::time::Duration;

use base64::Engine as _;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::descriptor::{Candidate, SearchDescriptor};
use super::EngineConfig;

/// Favicon service used when none is configured.
/// Icons are served at `{base}/{domain}.ico`.
pub const DEFAULT_ICON_SERVICE: &str = "https://icons.duckduckgo.com/ip3";

/// MIME type assumed when the service does not declare one.
pub const DEFAULT_ICON_MIME: &str = "image/x-icon";

/// User agent sent to the favicon service.
pub const USER_AGENT: &str = concat!("searchplug/", env!("CARGO_PKG_VERSION"));

/// Why an engine's favicon could not be embedded.
#[derive(Debug, Clone, Error)]
pub enum FaviconError {
    #[error("failed to parse URL template {template:?}: {reason}")]
    TemplateUrl { template: String, reason: String },

    #[error("URL template {template:?} has no host to look up a favicon for")]
    MissingHost { template: String },

    #[error("failed to retrieve favicon {url:?}: {reason}")]
    Request { url: String, reason: String },

    #[error("favicon service returned HTTP {status} for {url:?}")]
    Status { url: String, status: u16 },

    #[error("failed to read favicon contents from {url:?}: {reason}")]
    Body { url: String, reason: String },
}

/// Per-engine favicon behavior. Never part of the published document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaviconOptions {
    /// Domain to look the icon up for, instead of the query URL's host.
    pub source_domain: Option<String>,
    /// When false the configured image is published untouched.
    pub fetch: bool,
}

impl Default for FaviconOptions {
    fn default() -> Self {
        Self {
            source_domain: None,
            fetch: true,
        }
    }
}

impl FaviconOptions {
    pub fn with_domain(domain: impl Into<String>) -> Self {
        Self {
            source_domain: Some(domain.into()),
            fetch: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            source_domain: None,
            fetch: false,
        }
    }
}

/// Pick the domain whose icon represents this engine.
///
/// An explicit `source_domain` wins and the template is left alone; otherwise
/// the template is parsed and its host is used.
pub fn icon_domain(
    descriptor: &SearchDescriptor,
    options: &FaviconOptions,
) -> Result<String, FaviconError> {
    if let Some(domain) = options.source_domain.as_deref().filter(|d| !d.is_empty()) {
        return Ok(domain.to_string());
    }

    let template = &descriptor.url.template;
    let parsed = url::Url::parse(template).map_err(|e| FaviconError::TemplateUrl {
        template: template.clone(),
        reason: e.to_string(),
    })?;

    parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .ok_or_else(|| FaviconError::MissingHost {
            template: template.clone(),
        })
}

/// Build a `data:` URL carrying `bytes` base64-encoded.
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime_type, encoded)
}

/// Fetches favicons and folds them into descriptors.
#[derive(Clone)]
pub struct FaviconResolver {
    client: Client,
    service_base: String,
}

impl FaviconResolver {
    /// Create a resolver against `service_base` (without trailing slash).
    ///
    /// With `timeout` unset the client keeps reqwest's defaults.
    pub fn new(
        service_base: impl Into<String>,
        timeout: Option<Duration>,
    ) -> reqwest::Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT).gzip(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self::with_client(client, service_base))
    }

    pub fn with_client(client: Client, service_base: impl Into<String>) -> Self {
        let service_base = service_base.into().trim_end_matches('/').to_string();
        Self {
            client,
            service_base,
        }
    }

    /// Icon URL for a domain, e.g. `https://icons.duckduckgo.com/ip3/go.dev.ico`.
    pub fn icon_url(&self, domain: &str) -> String {
        format!("{}/{}.ico", self.service_base, domain)
    }

    /// Resolve one engine's favicon.
    ///
    /// Never fails outright: on error the descriptor comes back unchanged and
    /// the error rides along in the returned [`Candidate`].
    pub async fn resolve(
        &self,
        mut descriptor: SearchDescriptor,
        options: &FaviconOptions,
    ) -> Candidate {
        if !options.fetch {
            return Candidate::ready(descriptor);
        }

        let outcome = match icon_domain(&descriptor, options) {
            Ok(domain) => self.fetch(&domain).await,
            Err(e) => Err(e),
        };

        let favicon = match outcome {
            Ok((mime_type, bytes)) => {
                descriptor.image.data = data_url(&mime_type, &bytes);
                descriptor.image.mime_type = mime_type;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Favicon for {:?} not embedded: {}", descriptor.short_name, e);
                Err(e)
            }
        };

        Candidate {
            descriptor,
            favicon,
        }
    }

    /// Resolve every engine in order, one request at a time.
    pub async fn resolve_all(&self, engines: Vec<EngineConfig>) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(engines.len());
        for engine in engines {
            candidates.push(self.resolve(engine.descriptor, &engine.favicon).await);
        }
        candidates
    }

    async fn fetch(&self, domain: &str) -> Result<(String, Vec<u8>), FaviconError> {
        let url = self.icon_url(domain);
        tracing::debug!("Fetching favicon {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FaviconError::Request {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FaviconError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let mime_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_ICON_MIME)
            .to_string();

        let bytes = response.bytes().await.map_err(|e| FaviconError::Body {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Fetched {} bytes of {} from {}", bytes.len(), mime_type, url);
        Ok((mime_type, bytes.to_vec()))
    }
}
