//! Mining and coin transfer operations
//!
//! Each operation re-establishes the loaded-wallet invariant before
//! touching the wallet. Steps within an operation run strictly in order;
//! any failed step aborts the whole operation with the node's diagnostic
//! text attached.

use serde::Serialize;

use crate::error::{Result, ServiceError};
use crate::nodes::NodeHandle;
use crate::runner::CommandRunner;
use crate::wallet::{ensure_wallet, DEFAULT_WALLET};

/// Outcome of a block generation request. `hashes` has exactly `count`
/// entries on success; the node mines all requested blocks in one RPC or
/// none at all.
#[derive(Debug, Clone, Serialize)]
pub struct BlockGenerationResult {
    pub count: u64,
    pub hashes: Vec<String>,
}

fn annotate(node: &NodeHandle, step: &str) -> impl FnOnce(ServiceError) -> ServiceError {
    let context = format!("{} {}", node.id, step);
    move |e| ServiceError::operation(context, e.detail().to_string())
}

/// Mine `count` blocks to a fresh address on `node`. Zero is permitted and
/// yields an empty hash list without invoking the node at all.
pub async fn generate_blocks(
    runner: &dyn CommandRunner,
    node: &NodeHandle,
    count: u64,
) -> Result<BlockGenerationResult> {
    if count == 0 {
        return Ok(BlockGenerationResult {
            count: 0,
            hashes: Vec::new(),
        });
    }

    ensure_wallet(runner, node, DEFAULT_WALLET).await;

    let address = runner
        .run(&node.cli_args(&["getnewaddress"]))
        .await
        .map_err(annotate(node, "getnewaddress"))?;

    let raw = runner
        .run(&node.cli_args(&["generatetoaddress", &count.to_string(), &address]))
        .await
        .map_err(annotate(node, "generatetoaddress"))?;

    let hashes: Vec<String> = serde_json::from_str(&raw).map_err(|e| {
        ServiceError::operation(
            format!("{} generatetoaddress", node.id),
            format!("unparseable block hash list: {}", e),
        )
    })?;

    Ok(BlockGenerationResult { count, hashes })
}

/// Issue one fresh receiving address from `node`'s wallet.
pub async fn new_address(runner: &dyn CommandRunner, node: &NodeHandle) -> Result<String> {
    ensure_wallet(runner, node, DEFAULT_WALLET).await;

    runner
        .run(&node.cli_args(&["getnewaddress"]))
        .await
        .map_err(annotate(node, "getnewaddress"))
}

/// Submit a payment of `amount` to `address` from `node`'s default wallet.
/// Amount validation (positivity, balance) is the node's responsibility;
/// its raw error text is surfaced unchanged.
pub async fn send_coins(
    runner: &dyn CommandRunner,
    node: &NodeHandle,
    address: &str,
    amount: f64,
) -> Result<String> {
    ensure_wallet(runner, node, DEFAULT_WALLET).await;

    runner
        .run(&node.cli_args(&["sendtoaddress", address, &amount.to_string()]))
        .await
        .map_err(annotate(node, "sendtoaddress"))
}
