//! g5 CLI - Entry point
//!
//! Usage: g5 <command> [options]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use g5::cli::{Cli, Commands};
use g5::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (stderr, so tables on stdout stay clean)
    let default_filter = if cli.verbose { "g5=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let config_path = cli.config;
    let load_config = || Config::load_with(config_path.as_deref());

    match cli.command {
        Commands::Add(args) => g5::cli::add::run(args, &load_config()?),
        Commands::Show(args) => g5::cli::show::run(args, &load_config()?),
        Commands::Export(args) => g5::cli::export::run(args, &load_config()?),
        Commands::Config(args) => g5::cli::config::run(args),
    }
}
