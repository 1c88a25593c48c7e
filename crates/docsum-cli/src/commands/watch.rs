//! Watch command implementation.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use docsum_config::{AppPaths, Config, ConfigError};
use docsum_ingest::{FileWatcher, IngestQueue, PipelineContext, PipelineController, WatcherConfig};
use docsum_process::SystemTools;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{info, warn};

/// Load config, run startup checks, then watch until interrupted.
pub fn run() -> Result<()> {
    let config = Arc::new(load_config()?);

    let root = config.watch_directory();
    if !root.is_dir() {
        bail!("Watch directory does not exist: {}", root.display());
    }

    check_tools();

    let tools = Arc::new(SystemTools::new(
        &config.processing.whisper_model,
        &config.processing.whisper_language,
        config.processing.ocr_dpi,
    ));
    let ctx = PipelineContext::from_config(Arc::clone(&config), tools)
        .context("Failed to prepare the pipeline")?;

    report_stranded(&ctx)?;

    let mut watcher = FileWatcher::new(WatcherConfig::from_config(&config))?;
    watcher.start()?;

    println!("{}", "docsum is running".cyan().bold());
    println!("  {} {}", "Watching:".green(), root.display());
    println!("  {} {}", "Working:".green(), ctx.lifecycle.folders().working.display());
    println!("  {} {}", "Completed:".green(), ctx.lifecycle.folders().completed.display());
    println!("  {} {}", "Model:".green(), config.model);
    println!("\nPress Ctrl+C to stop.\n");

    let rt = Runtime::new().context("Failed to start async runtime")?;
    let result = rt.block_on(async {
        let queue = IngestQueue::spawn(
            PipelineController::new(ctx),
            config.processing.queue_capacity,
        );
        let _forwarder = watcher.spawn_forwarder(queue.sender());

        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl+C")?;

        info!("Interrupted, shutting down");
        println!("\n{}", "Stopped.".yellow());
        Ok::<(), anyhow::Error>(())
    });

    // In-flight work is abandoned where it stands.
    rt.shutdown_background();
    result
}

fn load_config() -> Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound(path)) => {
            eprintln!("{} {}", "No config file at".yellow(), path.display());
            eprintln!(
                "Create one (or point {} at one), for example:\n",
                docsum_config::CONFIG_ENV_VAR
            );
            eprintln!("{}", Config::example_config_string());
            bail!("Configuration not found: {}", path.display())
        }
        Err(e) => {
            let location = AppPaths::resolve_config_file()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unknown>".to_string());
            Err(e).with_context(|| format!("Failed to load configuration from {}", location))
        }
    }
}

fn check_tools() {
    let missing: Vec<_> = docsum_process::check_dependencies()
        .into_iter()
        .filter(|(_, available)| !available)
        .map(|(tool, _)| tool)
        .collect();

    if missing.is_empty() {
        return;
    }

    warn!("Processing tools not found: {}", missing.join(", "));
    println!("{}", "Warning: Some processing tools are not available:".yellow());
    for tool in &missing {
        println!("  - {}", tool);
    }
    println!("Files that need them will fail and stay in the working folder.\n");
}

fn report_stranded(ctx: &PipelineContext) -> Result<()> {
    let stranded = ctx
        .lifecycle
        .stranded_files()
        .context("Failed to list the working folder")?;

    if stranded.is_empty() {
        return Ok(());
    }

    warn!(
        "{} file(s) left in the working folder by an earlier run",
        stranded.len()
    );
    println!("{}", "Files left in the working folder:".yellow());
    for path in &stranded {
        warn!("Stranded: {:?}", path);
        println!("  - {}", path.display());
    }
    println!();
    Ok(())
}
