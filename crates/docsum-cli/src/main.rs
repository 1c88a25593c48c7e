//! Docsum - watch a folder, summarize every document dropped into it.

mod commands;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable switching on debug logging.
const VERBOSE_ENV_VAR: &str = "DOCSUM_VERBOSE";

/// Docsum - summarize documents, recordings and videos dropped into a folder
///
/// All behavior comes from the config file at $DOCSUM_CONFIG or the platform
/// config directory.
#[derive(Parser)]
#[command(name = "docsum")]
#[command(version)]
#[command(about = "Summarize documents, recordings and videos dropped into a folder")]
struct Cli {}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docsum=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docsum=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn verbose_from_env() -> bool {
    std::env::var_os(VERBOSE_ENV_VAR).is_some_and(|v| !v.is_empty() && v != "0")
}

fn main() {
    let _cli = Cli::parse();
    init_logging(verbose_from_env());

    if let Err(e) = commands::watch::run() {
        tracing::error!("Fatal: {:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
