use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelay_core::{
    load_config, validate_config, JobState, ProgressSink, RelayOrchestrator, TriggerRequest,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Progress sink that prints one status line per transition, the way
/// a chat frontend would relay them.
struct StdoutProgress;

impl ProgressSink for StdoutProgress {
    fn report(&self, correlation_id: &str, state: &JobState, detail: &str) {
        if detail.is_empty() {
            println!("[{correlation_id}] {}", state.message());
        } else {
            println!("[{correlation_id}] {} ({detail})", state.message());
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Usage: reelay <url> [caption words...]
    let mut args = std::env::args().skip(1);
    let source_url = match args.next() {
        Some(url) => url,
        None => bail!("usage: reelay <url> [caption...]"),
    };
    let caption = args.collect::<Vec<_>>().join(" ");

    // Determine config path
    let config_path = std::env::var("REELAY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;
    info!(version = VERSION, config = ?config.sanitized(), "Configuration loaded");

    let orchestrator = RelayOrchestrator::from_config(&config);

    let receipt = orchestrator
        .run_job(
            TriggerRequest {
                source_url,
                caption,
            },
            &StdoutProgress,
        )
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!("{}", receipt.public_link.url);
    Ok(())
}
