//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod render;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use searchplug::config::Config;

#[derive(Parser)]
#[command(name = "searchplug")]
#[command(about = "Advertise search engine shortcuts to your browser via OpenSearch")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the discovery page and description documents
    Serve {
        /// Address to bind: PORT, HOST, or HOST:PORT
        #[arg(short, long)]
        bind: Option<String>,
        /// Do not open the discovery page in a browser
        #[arg(long)]
        no_browser: bool,
    },

    /// Resolve favicons and validate every configured engine
    Check,

    /// Print the description document for one engine
    Render {
        /// Short name of the engine
        short_name: String,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        tracing::debug!("Verbose logging enabled");
    }

    let config = Config::load(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Serve { bind, no_browser } => {
            serve::cmd_serve(config, bind.as_deref(), no_browser).await
        }
        Commands::Check => check::cmd_check(&config).await,
        Commands::Render { short_name } => render::cmd_render(&config, &short_name).await,
    }
}
