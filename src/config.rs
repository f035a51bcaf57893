//! Configuration management for regtest-box
//!
//! All paths are resolved once at process start from the environment and
//! passed into component constructors. Operation logic never re-reads
//! ambient state.

use std::env;
use std::path::PathBuf;

use crate::error::{Result, ServiceError};
use crate::nodes::{NodeHandle, NodeId};

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the `bitcoind` and `bitcoin-cli` executables.
    pub bin_dir: PathBuf,
    pub data_dir_1: PathBuf,
    pub data_dir_2: PathBuf,
    pub api_port: u16,
    /// Bound on every subprocess invocation so a hung daemon cannot stall
    /// the orchestrator.
    pub command_timeout_secs: u64,
    pub audit_log: PathBuf,
}

impl Config {
    /// Resolve configuration from the environment, falling back to the
    /// regtest sandbox defaults.
    pub fn from_env() -> Result<Self> {
        let config = Config {
            bin_dir: env::var("BITCOIN_BIN_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_bin_dir()),
            data_dir_1: env::var("DATA_DIR_1")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("1")),
            data_dir_2: env::var("DATA_DIR_2")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("2")),
            api_port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(DEFAULT_API_PORT),
            command_timeout_secs: env::var("COMMAND_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse::<u64>().ok())
                .unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS),
            audit_log: env::var("REGTEST_AUDIT_LOG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_audit_log()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate critical values before any component is constructed.
    pub fn validate(&self) -> Result<()> {
        if self.bin_dir.as_os_str().is_empty() {
            return Err(ServiceError::Configuration(
                "BITCOIN_BIN_DIR must not be empty".to_string(),
            ));
        }
        if self.data_dir_1 == self.data_dir_2 {
            return Err(ServiceError::Configuration(format!(
                "node data directories must be distinct (both are {})",
                self.data_dir_1.display()
            )));
        }
        if self.command_timeout_secs == 0 {
            return Err(ServiceError::Configuration(
                "COMMAND_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn handle(&self, id: NodeId) -> NodeHandle {
        let data_dir = match id {
            NodeId::One => self.data_dir_1.clone(),
            NodeId::Two => self.data_dir_2.clone(),
        };
        NodeHandle::new(id, &self.bin_dir, data_dir)
    }

    pub fn node_handles(&self) -> [NodeHandle; 2] {
        [self.handle(NodeId::One), self.handle(NodeId::Two)]
    }
}

pub const DEFAULT_API_PORT: u16 = 3000;
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;

fn default_bin_dir() -> PathBuf {
    PathBuf::from("/tmp/bitcoin_setup/bitcoin-0.21.0/bin")
}

fn default_audit_log() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".regtest-box")
        .join("audit.log")
}
