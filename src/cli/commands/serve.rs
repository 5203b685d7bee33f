//! Web server command.

use console::style;

use searchplug::config::{Config, ServerOptions};

use crate::cli::helpers::load_registry;

/// Resolve and validate every engine, then start the web server.
pub async fn cmd_serve(config: Config, bind: Option<&str>, no_browser: bool) -> anyhow::Result<()> {
    let mut options = config.server.clone();
    if let Some(bind) = bind {
        apply_bind_address(&mut options, bind)?;
    }
    options.validate()?;

    println!("{} Resolving search engines...", style("→").cyan());
    let registry = load_registry(&config).await?;
    println!(
        "  {} {} search engines ready",
        style("✓").green(),
        registry.len()
    );

    println!(
        "{} Starting searchplug at {}",
        style("→").cyan(),
        options.base_url()
    );
    println!("  Press Ctrl+C to stop");

    searchplug::server::serve(&options, registry, !no_browser).await
}

/// Apply a bind address that can be:
/// - Just a port: "3030" -> keeps the configured host
/// - Just a host: "0.0.0.0" or "[::1]" -> keeps the configured port
/// - Host and port: "0.0.0.0:3030" or "[::1]:3030"
fn apply_bind_address(options: &mut ServerOptions, bind: &str) -> anyhow::Result<()> {
    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        options.port = port;
        return Ok(());
    }

    // Bracketed IPv6 host, with or without a port
    if let Some(rest) = bind.strip_prefix('[') {
        match rest.split_once("]:") {
            Some((host, port_str)) => {
                options.host = host.to_string();
                options.port = parse_port(port_str, bind)?;
            }
            None => options.host = rest.trim_end_matches(']').to_string(),
        }
        return Ok(());
    }

    // Try parsing as host:port, unless it is a bare IPv6 address
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if !host.contains(':') {
            options.host = host.to_string();
            options.port = parse_port(port_str, bind)?;
            return Ok(());
        }
    }

    // Must be just a host, keep the configured port
    options.host = bind.to_string();
    Ok(())
}

fn parse_port(port: &str, bind: &str) -> anyhow::Result<u16> {
    port.parse::<u16>()
        .map_err(|_| anyhow::anyhow!("invalid port in bind address {:?}", bind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(addr: &str) -> anyhow::Result<ServerOptions> {
        let mut options = ServerOptions::default();
        apply_bind_address(&mut options, addr)?;
        Ok(options)
    }

    #[test]
    fn test_port_only() {
        let options = bind("8080").unwrap();
        assert_eq!(options.host, "localhost");
        assert_eq!(options.port, 8080);
    }

    #[test]
    fn test_host_only() {
        let options = bind("0.0.0.0").unwrap();
        assert_eq!(options.host, "0.0.0.0");
        assert_eq!(options.port, 5030);
    }

    #[test]
    fn test_host_and_port() {
        let options = bind("127.0.0.1:9000").unwrap();
        assert_eq!(options.host, "127.0.0.1");
        assert_eq!(options.port, 9000);
    }

    #[test]
    fn test_ipv6() {
        let options = bind("[::1]:9000").unwrap();
        assert_eq!(options.host, "::1");
        assert_eq!(options.port, 9000);

        let options = bind("::1").unwrap();
        assert_eq!(options.host, "::1");
        assert_eq!(options.port, 5030);
    }

    #[test]
    fn test_bracketed_ipv6_without_port() {
        let options = bind("[::1]").unwrap();
        assert_eq!(options.host, "::1");
        assert_eq!(options.port, 5030);

        assert!(bind("[::1]:").is_err());
    }

    #[test]
    fn test_bad_port() {
        assert!(bind("localhost:http").is_err());
    }
}
