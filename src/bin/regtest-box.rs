#![forbid(unsafe_code)]
//! regtest-box server entry point
//!
//! Resolves configuration from the environment, applies command-line
//! overrides, and serves the orchestration API.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use regtest_box::api::{self, Service};
use regtest_box::config::Config;
use regtest_box::orchestrator::Orchestrator;
use regtest_box::runner::ProcessRunner;

#[derive(Parser)]
#[command(
    name = "regtest-box",
    about = "Control-plane service for a two-node bitcoin regtest sandbox"
)]
struct Cli {
    /// Port for the API server (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding bitcoind and bitcoin-cli (overrides BITCOIN_BIN_DIR)
    #[arg(long)]
    bin_dir: Option<PathBuf>,

    /// Data directory for node 1 (overrides DATA_DIR_1)
    #[arg(long)]
    datadir1: Option<PathBuf>,

    /// Data directory for node 2 (overrides DATA_DIR_2)
    #[arg(long)]
    datadir2: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(port) = cli.port {
        config.api_port = port;
    }
    if let Some(bin_dir) = cli.bin_dir {
        config.bin_dir = bin_dir;
    }
    if let Some(datadir) = cli.datadir1 {
        config.data_dir_1 = datadir;
    }
    if let Some(datadir) = cli.datadir2 {
        config.data_dir_2 = datadir;
    }
    config.validate()?;

    info!(
        bin_dir = %config.bin_dir.display(),
        datadir1 = %config.data_dir_1.display(),
        datadir2 = %config.data_dir_2.display(),
        port = config.api_port,
        "Starting regtest-box"
    );

    let runner = Arc::new(ProcessRunner::new(Duration::from_secs(
        config.command_timeout_secs,
    )));
    let port = config.api_port;
    let orchestrator = Arc::new(Orchestrator::new(config, runner));
    let service = Arc::new(Service::new(orchestrator));

    api::run_server(service, port).await
}
