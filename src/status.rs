//! Node status aggregation
//!
//! Snapshots are constructed fresh on every query and never persisted.
//! Nodes take time to finish RPC bring-up after start, so every internal
//! failure degrades to a soft "offline/starting" result that polling
//! clients can treat as retriable.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};
use crate::nodes::NodeHandle;
use crate::runner::CommandRunner;
use crate::wallet::{ensure_wallet, DEFAULT_WALLET};

pub const STATUS_ONLINE: &str = "online";
pub const STATUS_OFFLINE: &str = "offline/starting";

/// Per-request aggregation of chain, wallet and network state for one node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeStatusSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connections: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NodeStatusSnapshot {
    fn online(chain: ChainInfo, wallet: WalletInfo, network: NetworkInfo) -> Self {
        Self {
            blocks: Some(chain.blocks),
            balance: Some(wallet.balance),
            connections: Some(network.connections),
            difficulty: Some(chain.difficulty),
            version: Some(network.version),
            status: STATUS_ONLINE,
            error: None,
        }
    }

    pub fn offline(error: String) -> Self {
        Self {
            blocks: None,
            balance: None,
            connections: None,
            difficulty: None,
            version: None,
            status: STATUS_OFFLINE,
            error: Some(error),
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == STATUS_ONLINE
    }
}

/// Snapshots for both managed nodes; each is produced independently so a
/// failure on one has no effect on the other.
#[derive(Debug, Clone, Serialize)]
pub struct StatusAll {
    pub node1: NodeStatusSnapshot,
    pub node2: NodeStatusSnapshot,
}

// Projections of the client's JSON responses; unknown fields are ignored.

#[derive(Debug, Deserialize)]
struct ChainInfo {
    blocks: u64,
    difficulty: f64,
}

#[derive(Debug, Deserialize)]
struct WalletInfo {
    balance: f64,
}

#[derive(Debug, Deserialize)]
struct NetworkInfo {
    connections: u64,
    version: i64,
}

/// Query one node's status. Never returns an error: the wallet-ensure step
/// is best-effort, and any failed query degrades the whole snapshot.
pub async fn node_status(runner: &dyn CommandRunner, node: &NodeHandle) -> NodeStatusSnapshot {
    let _ = ensure_wallet(runner, node, DEFAULT_WALLET).await;

    match query_node(runner, node).await {
        Ok(snapshot) => snapshot,
        Err(e) => NodeStatusSnapshot::offline(e.detail().to_string()),
    }
}

async fn query_node(runner: &dyn CommandRunner, node: &NodeHandle) -> Result<NodeStatusSnapshot> {
    let chain_raw = runner.run(&node.cli_args(&["getblockchaininfo"])).await?;
    let chain: ChainInfo = parse_response(&chain_raw, "getblockchaininfo")?;

    let wallet_raw = runner.run(&node.cli_args(&["getwalletinfo"])).await?;
    let wallet: WalletInfo = parse_response(&wallet_raw, "getwalletinfo")?;

    let network_raw = runner.run(&node.cli_args(&["getnetworkinfo"])).await?;
    let network: NetworkInfo = parse_response(&network_raw, "getnetworkinfo")?;

    Ok(NodeStatusSnapshot::online(chain, wallet, network))
}

fn parse_response<T: serde::de::DeserializeOwned>(raw: &str, rpc: &str) -> Result<T> {
    serde_json::from_str(raw)
        .map_err(|e| ServiceError::operation(format!("parse {} response", rpc), e.to_string()))
}
