//! Description document render command.

use searchplug::config::Config;

use crate::cli::helpers::load_registry;

/// Print the description document for one engine.
pub async fn cmd_render(config: &Config, short_name: &str) -> anyhow::Result<()> {
    let registry = load_registry(config).await?;

    let Some(engine) = registry.find_by_short_name(short_name) else {
        anyhow::bail!("No search engine named {:?}", short_name);
    };

    let xml = searchplug::server::render_descriptor_xml(engine)?;
    println!("{}", xml);
    Ok(())
}
