//! Papyr - a static site generator for markdown blogs.

mod build;
mod cli;
mod config;
mod content;
mod emit;
mod error;
mod render;
mod serve;
mod site;
mod taxonomy;
mod utils;
mod watch;

use anyhow::{Context, Result, bail};
use build::BuildCtx;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use serve::serve_site;
use std::sync::atomic::Ordering;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static SiteConfig = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Build { .. } => run_build(config),
        Commands::Serve { .. } => serve_site(config),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(std::path::Path::new("./"));
    let config_path = root.join(&cli.config);

    if !config_path.exists() {
        bail!("Config file not found: {}", config_path.display());
    }

    let mut config = SiteConfig::from_path(&config_path)?;
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}

/// Run one full build, mapping the terminal state to the exit code.
///
/// Exit 0 covers full success and non-strict builds with per-document
/// warnings; only fatal conditions exit non-zero.
fn run_build(config: &'static SiteConfig) -> Result<()> {
    let ctx = BuildCtx::new(config);

    let cancel = ctx.cancel_flag();
    ctrlc::set_handler(move || {
        cancel.store(true, Ordering::Relaxed);
    })
    .context("Failed to set Ctrl+C handler")?;

    let report = build::build_site(config, &ctx);
    build::log_summary(&report);

    if report.is_fatal() {
        bail!("build failed");
    }
    Ok(())
}
