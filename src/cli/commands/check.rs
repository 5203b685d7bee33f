//! Engine check command.

use console::style;

use searchplug::config::Config;
use searchplug::opensearch::{validate_all, SEARCH_TERMS_PLACEHOLDER};

use crate::cli::helpers::resolve_candidates;

/// Resolve and validate every engine, reporting each one.
pub async fn cmd_check(config: &Config) -> anyhow::Result<()> {
    if let Some(path) = &config.source_path {
        println!("{} Config: {}", style("→").dim(), path.display());
    }

    let candidates = resolve_candidates(config).await?;
    if candidates.is_empty() {
        println!("{} No search engines configured", style("!").yellow());
        return Ok(());
    }

    for candidate in &candidates {
        let engine = &candidate.descriptor;
        match candidate.validate() {
            Ok(()) => println!(
                "  {} {} ({})",
                style("✓").green(),
                engine.display_name(),
                engine.short_name
            ),
            Err(e) => println!(
                "  {} {} ({}): {}",
                style("✗").red(),
                engine.display_name(),
                engine.short_name,
                e
            ),
        }

        if !engine.url.template.contains(SEARCH_TERMS_PLACEHOLDER) {
            println!(
                "    {} URL template has no {} placeholder",
                style("!").yellow(),
                SEARCH_TERMS_PLACEHOLDER
            );
        }
    }

    validate_all(&candidates)?;
    Ok(())
}
