//! Vote Guard CLI
//!
//! Command-line driver over the library: runs one cached read or one guarded
//! call against the configured voting backend and prints the outcome.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vote_guard::client::ReadEndpoint;
use vote_guard::models::VoteRequest;
use vote_guard::{Config, ReadCache, RetryCoordinator, SecurityGuard, VotingApi};

#[derive(Parser)]
#[command(name = "vote_guard")]
#[command(about = "Query the voting backend through the resilience layer", long_about = None)]
struct Cli {
    /// Overrides VOTE_API_BASE_URL
    #[arg(short, long)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cached voting status
    Status,
    /// Cached vote count
    Count,
    /// Cached vote history
    History,
    /// Cached queue status
    Queue,
    /// Cached session debug info
    Session,
    /// Cached backend health
    Health,
    /// Guarded voting status check
    Check,
    /// Guarded vote submission
    Vote {
        #[arg(short, long)]
        choice: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vote_guard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    info!(
        base_url = %config.base_url,
        max_retries = config.max_retries,
        "Configuration loaded"
    );

    let api = Arc::new(VotingApi::new(&config).context("building voting client")?);

    let endpoint = match cli.command {
        Commands::Status => ReadEndpoint::Status,
        Commands::Count => ReadEndpoint::Count,
        Commands::History => ReadEndpoint::History,
        Commands::Queue => ReadEndpoint::QueueStatus,
        Commands::Session => ReadEndpoint::SessionDebug,
        Commands::Health => ReadEndpoint::Health,
        Commands::Check => {
            let guard = SecurityGuard::new(
                api,
                Arc::new(RetryCoordinator::new()),
                config.retry_options(),
            );
            let proceed = guard.check_voting_status().await?;
            return report(&guard, proceed).await;
        }
        Commands::Vote { choice } => {
            let vote = VoteRequest::new(choice);
            if let Some(message) = vote.validate() {
                bail!(message);
            }

            let coordinator = Arc::new(RetryCoordinator::new());
            let mut toasts = coordinator.subscribe();
            tokio::spawn(async move {
                while let Ok(notice) = toasts.recv().await {
                    warn!(
                        "Rate limited, retrying ({}/{}) after {:?}",
                        notice.attempt, notice.max_retries, notice.delay
                    );
                }
            });

            let guard = SecurityGuard::new(api, coordinator, config.retry_options());
            let accepted = guard.submit_vote(&vote).await?;
            return report(&guard, accepted).await;
        }
    };

    let reads = ReadCache::from_config(api, &config);
    let purge_tasks = if config.purge_interval_secs > 0 {
        reads.spawn_purge_tasks(Duration::from_secs(config.purge_interval_secs))
    } else {
        Vec::new()
    };

    let data = reads.fetch(endpoint).await;
    for task in purge_tasks {
        task.abort();
    }
    let data = data?;
    print_json(&data)
}

async fn report(guard: &SecurityGuard, proceed: bool) -> anyhow::Result<()> {
    let state = guard.state().await;
    print_json(&serde_json::json!({ "proceed": proceed, "security": state }))
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
