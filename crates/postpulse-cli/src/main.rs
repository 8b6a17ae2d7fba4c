mod acquire;
mod report;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use postpulse_core::config::normalize_handle;
use postpulse_core::AppConfig;
use postpulse_store::ArtifactPaths;
use postpulse_twitter::TwitterClient;
use tracing_subscriber::EnvFilter;

use crate::acquire::{AcquireSettings, AcquisitionOrchestrator, DataSource, Snapshot};

#[derive(Debug, Parser)]
#[command(name = "postpulse-cli")]
#[command(about = "Collect and summarize engagement stats for one X/Twitter account")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one acquisition cycle and print the engagement summary.
    Collect {
        /// Account handle; overrides `POSTPULSE_HANDLE`.
        #[arg(long)]
        handle: Option<String>,
        /// Posts to request (clamped to 5..=100); overrides `POSTPULSE_MAX_RESULTS`.
        #[arg(long)]
        max_results: Option<u32>,
        /// Also print per-day totals.
        #[arg(long)]
        daily: bool,
    },
    /// Summarize the persisted snapshot without calling the API.
    Report {
        /// Account handle; overrides `POSTPULSE_HANDLE`.
        #[arg(long)]
        handle: Option<String>,
        /// Also print per-day totals.
        #[arg(long)]
        daily: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("postpulse-cli: run `collect` or `report` (see --help)");
        return Ok(());
    };

    let config = postpulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Collect {
            handle,
            max_results,
            daily,
        } => run_collect(&config, handle.as_deref(), max_results, daily).await,
        Commands::Report { handle, daily } => run_report(&config, handle.as_deref(), daily),
    }
}

async fn run_collect(
    config: &AppConfig,
    handle_override: Option<&str>,
    max_results_override: Option<u32>,
    daily: bool,
) -> anyhow::Result<()> {
    let handle = resolve_handle(config.handle.as_deref(), handle_override)?;
    let mut settings = AcquireSettings::new(handle, config);
    if let Some(n) = max_results_override {
        settings.max_results = n;
    }

    let token = config
        .bearer_token
        .as_deref()
        .context("POSTPULSE_BEARER_TOKEN must be set to collect posts")?;
    let client = TwitterClient::with_base_url(
        token,
        config.request_timeout_secs,
        &config.user_agent,
        &config.api_base_url,
    )?;

    let handle = settings.handle.clone();
    let snapshot = AcquisitionOrchestrator::new(client, settings, &config.data_dir)
        .run()
        .await?;

    print!("{}", report::render(&handle, &snapshot, daily));
    Ok(())
}

fn run_report(config: &AppConfig, handle_override: Option<&str>, daily: bool) -> anyhow::Result<()> {
    let handle = resolve_handle(config.handle.as_deref(), handle_override)?;
    let store = ArtifactPaths::for_handle(&config.data_dir, &handle).snapshot_store();
    let dataset = store.load()?;

    if dataset.is_empty() {
        anyhow::bail!(
            "no snapshot found for @{handle} at {}; run `collect` first",
            store.path().display()
        );
    }

    let acquired_at = std::fs::metadata(store.path())
        .and_then(|m| m.modified())
        .map_or_else(|_| Utc::now(), DateTime::<Utc>::from);

    let snapshot = Snapshot {
        dataset,
        source: DataSource::Cache,
        acquired_at,
        fallback_reason: None,
    };
    print!("{}", report::render(&handle, &snapshot, daily));
    Ok(())
}

/// `--handle` wins over `POSTPULSE_HANDLE`; one of them must be set.
fn resolve_handle(configured: Option<&str>, flag: Option<&str>) -> anyhow::Result<String> {
    match flag {
        Some(raw) => {
            let handle = normalize_handle(raw);
            if handle.is_empty() {
                anyhow::bail!("--handle must not be empty");
            }
            Ok(handle)
        }
        None => configured
            .map(str::to_owned)
            .context("no account handle: set POSTPULSE_HANDLE or pass --handle"),
    }
}

#[cfg(test)]
mod tests;
