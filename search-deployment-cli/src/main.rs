//! Command-line adapter: wait for an Atlas Search deployment to become ready or to be deleted.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, warn};
use search_deployment_waiter::{
    wait_for_deletion, wait_for_state, AtlasSearchClient, CancellationToken, RetryConfig,
    DEFAULT_BASE_URL,
};

/// Per-request HTTP timeout, separate from the overall wait budget
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(
    name = "search-deployment-wait",
    version,
    about = "Wait for an Atlas Search deployment to finish a state transition"
)]
struct Cli {
    /// Atlas Admin API base URL
    #[arg(long, env = "ATLAS_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Bearer token sent with every status request
    #[arg(long, env = "ATLAS_ACCESS_TOKEN", hide_env_values = true, global = true)]
    access_token: Option<String>,

    /// Overall wait budget in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Minimum interval between status requests, in milliseconds
    #[arg(long, global = true)]
    min_interval_ms: Option<u64>,

    /// Ceiling for the growing interval between status requests, in milliseconds
    #[arg(long, global = true)]
    max_interval_ms: Option<u64>,

    /// Fixed delay between status requests, in milliseconds (disables backoff)
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Wait until the deployment reports IDLE, then print it as JSON
    Ready(Target),
    /// Wait until the deployment no longer exists
    Deleted(Target),
}

#[derive(Args, Debug)]
struct Target {
    /// Project (group) id owning the cluster
    #[arg(long)]
    project_id: String,

    /// Cluster the search deployment is attached to
    #[arg(long)]
    cluster_name: String,
}

impl Cli {
    fn retry_config(&self) -> Result<RetryConfig> {
        let mut config = RetryConfig::default();
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = self.min_interval_ms {
            config.min_retry_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.max_interval_ms {
            config.max_retry_interval = Duration::from_millis(ms);
        }
        config.delay = self.delay_ms.map(Duration::from_millis);
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Cancel the token on the first Ctrl-C
fn cancel_on_interrupt(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling wait");
            cancel.cancel();
        }
    });
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.retry_config()?;
    debug!("Using retry configuration: {config:?}");

    let http = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;
    let mut client = AtlasSearchClient::new(http, cli.base_url);
    if let Some(token) = cli.access_token {
        client = client.with_access_token(token);
    }

    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone());

    match cli.command {
        Command::Ready(target) => {
            let deployment = wait_for_state(
                &cancel,
                &target.project_id,
                &target.cluster_name,
                &client,
                &config,
            )
            .await
            .with_context(|| {
                format!(
                    "Search deployment of cluster '{}' did not become ready",
                    target.cluster_name
                )
            })?;
            let json = serde_json::to_string_pretty(&deployment)
                .context("Failed to serialize search deployment")?;
            println!("{json}");
        }
        Command::Deleted(target) => {
            wait_for_deletion(
                &cancel,
                &target.project_id,
                &target.cluster_name,
                &client,
                &config,
            )
            .await
            .with_context(|| {
                format!(
                    "Search deployment of cluster '{}' was not deleted",
                    target.cluster_name
                )
            })?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
