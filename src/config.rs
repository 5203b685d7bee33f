//! Configuration management for searchplug using the prefer crate.
//!
//! A config file is optional. Without one the server listens on
//! `localhost:5030` and advertises the built-in engine list.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::opensearch::{default_engines, EngineConfig, DEFAULT_ICON_SERVICE};

/// Default listen host.
pub const DEFAULT_HOST: &str = "localhost";
/// Default listen port.
pub const DEFAULT_PORT: u16 = 5030;
/// Default per-request timeout for the HTTP server, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {format} config {path}: {reason}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        reason: String,
    },

    #[error("port must be between 1 and 65535")]
    InvalidPort,

    #[error("host is empty")]
    EmptyHost,

    #[error("TLS is enabled but no certificate file was supplied")]
    MissingTlsCert,

    #[error("TLS is enabled but no key file was supplied")]
    MissingTlsKey,

    #[error("TLS is enabled but this build was compiled without the `tls` feature")]
    TlsUnavailable,

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

/// TLS listener settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsOptions {
    pub enabled: bool,
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
}

/// Where and how the HTTP server listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
    /// Requests that take longer are answered with 408. 0 disables the limit.
    pub request_timeout_secs: u64,
    pub tls: TlsOptions,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            tls: TlsOptions::default(),
        }
    }
}

impl ServerOptions {
    /// Check that the options describe a server we can start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.tls.enabled {
            if self.tls.cert_file.is_none() {
                return Err(ConfigError::MissingTlsCert);
            }
            if self.tls.key_file.is_none() {
                return Err(ConfigError::MissingTlsKey);
            }
            if !cfg!(feature = "tls") {
                return Err(ConfigError::TlsUnavailable);
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// URL of the discovery page, e.g. `http://localhost:5030`.
    pub fn base_url(&self) -> String {
        let scheme = if self.tls.enabled { "https" } else { "http" };
        if self.host.contains(':') {
            format!("{}://[{}]:{}", scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}", scheme, self.host, self.port)
        }
    }
}

/// Favicon service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaviconServiceConfig {
    /// Base URL; icons are requested at `{service_url}/{domain}.ico`.
    pub service_url: String,
    /// Overall limit for one icon request. Unset or 0 leaves the client
    /// without a timeout.
    pub timeout_secs: Option<u64>,
}

impl Default for FaviconServiceConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_ICON_SERVICE.to_string(),
            timeout_secs: None,
        }
    }
}

impl FaviconServiceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerOptions,
    pub favicon: FaviconServiceConfig,
    /// Engines in display order. Falls back to the built-in list when omitted.
    pub engines: Vec<EngineConfig>,
    /// File this configuration was read from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerOptions::default(),
            favicon: FaviconServiceConfig::default(),
            engines: default_engines(),
            source_path: None,
        }
    }
}

impl Config {
    /// Load configuration from `path` if given, otherwise from the first
    /// searchplug config file prefer discovers, otherwise defaults.
    ///
    /// Environment overrides are applied last.
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::load_from_path(path).await?,
            None => match prefer::load("searchplug").await {
                Ok(pref_config) => match pref_config.source_path() {
                    Some(path) => Self::load_from_path(path).await?,
                    None => Self::default(),
                },
                Err(_) => {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.with_env_overrides()
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext).map_err(|(format, reason)| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                format,
                reason,
            }
        })?;

        tracing::debug!("Loaded configuration from {}", path.display());
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn parse(contents: &str, ext: &str) -> Result<Self, (&'static str, String)> {
        match ext {
            "toml" => toml::from_str(contents).map_err(|e| ("TOML", e.to_string())),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ("YAML", e.to_string())),
            _ => serde_json::from_str(contents).map_err(|e| ("JSON", e.to_string())),
        }
    }

    /// Apply `SEARCHPLUG_HOST` and `SEARCHPLUG_PORT`.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(
            env::var("SEARCHPLUG_HOST").ok(),
            env::var("SEARCHPLUG_PORT").ok(),
        )
    }

    fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = host.filter(|h| !h.is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = port.filter(|p| !p.is_empty()) {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "SEARCHPLUG_PORT",
                value: port.clone(),
            })?;
        }
        Ok(self)
    }
}
