//! Shared helper functions for CLI commands.

use anyhow::Context;

use searchplug::config::Config;
use searchplug::opensearch::{Candidate, FaviconResolver, Registry};

/// Resolve favicons for every configured engine, in order.
pub async fn resolve_candidates(config: &Config) -> anyhow::Result<Vec<Candidate>> {
    let resolver = FaviconResolver::new(
        config.favicon.service_url.as_str(),
        config.favicon.timeout(),
    )
    .context("failed to create favicon HTTP client")?;

    tracing::info!("Resolving favicons for {} engines", config.engines.len());
    Ok(resolver.resolve_all(config.engines.clone()).await)
}

/// Run the full startup pipeline: resolve favicons, validate, register.
pub async fn load_registry(config: &Config) -> anyhow::Result<Registry> {
    let candidates = resolve_candidates(config).await?;
    let registry = Registry::load(candidates).context("search engine validation failed")?;
    tracing::info!("Loaded {} search engines", registry.len());
    Ok(registry)
}
