//! CLI entry point for doc-harvest.

use anyhow::{Context, Result};
use clap::Parser;
use doc_harvest::{HarvestConfig, HarvestOutcome, Harvester};
use tracing::{debug, error, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let file_config = match &args.config {
        Some(path) => HarvestConfig::load(path)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))?,
        None => HarvestConfig::load_default().context("Failed to load default config file")?,
    };
    let config = args.apply_to(file_config);
    config.validate()?;
    debug!(?config, "effective configuration");

    let harvester = Harvester::new(config)?.with_dry_run(args.dry_run);
    info!(
        url = %harvester.config().target_page_url,
        suffix = %harvester.config().link_suffix,
        "harvest starting"
    );

    // Run failures are reported, not turned into an exit code.
    // The second future only starts listening once the first has fired, so a
    // second Ctrl-C skips the rest of the grace period.
    match harvester.run(interrupt_signal(), interrupt_signal()).await {
        Ok(HarvestOutcome::DryRun(jobs)) => {
            for job in &jobs {
                println!("{} -> {}", job.url, job.destination.display());
            }
            println!("Dry run - {} file(s) would be downloaded", jobs.len());
        }
        Ok(HarvestOutcome::NoLinks | HarvestOutcome::Completed(_)) => {}
        Err(e) => error!(error = %e, "harvest failed"),
    }

    Ok(())
}

/// Completes on the next Ctrl-C delivered after it is first polled; never
/// completes if the handler cannot be installed.
async fn interrupt_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C; interrupt disabled");
        std::future::pending::<()>().await;
    }
    warn!("interrupt received");
}
