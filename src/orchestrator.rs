//! Shared orchestration state
//!
//! Binds the resolved configuration, the two node handles and the command
//! runner into one object the API layer delegates to. The runner is held
//! behind a trait object so tests can inject scripted fakes.

use std::sync::Arc;

use crate::audit::audit;
use crate::config::Config;
use crate::error::Result;
use crate::lifecycle::{self, StopReport};
use crate::nodes::{NodeHandle, NodeId};
use crate::ops::{self, BlockGenerationResult};
use crate::runner::CommandRunner;
use crate::status::{self, NodeStatusSnapshot, StatusAll};

pub struct Orchestrator {
    config: Config,
    nodes: [NodeHandle; 2],
    runner: Arc<dyn CommandRunner>,
}

impl Orchestrator {
    pub fn new(config: Config, runner: Arc<dyn CommandRunner>) -> Self {
        let nodes = config.node_handles();
        Self {
            config,
            nodes,
            runner,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn handle(&self, id: NodeId) -> &NodeHandle {
        match id {
            NodeId::One => &self.nodes[0],
            NodeId::Two => &self.nodes[1],
        }
    }

    /// Launch both daemons detached. Fails fast with a precondition error
    /// when the first node's data directory is missing; does not wait for
    /// RPC readiness.
    pub fn start_nodes(&self) -> Result<()> {
        lifecycle::start_nodes(&self.nodes)?;
        audit(&self.config.audit_log, "system", "start", "Nodes started");
        Ok(())
    }

    /// Request graceful shutdown of both nodes. Always produces a report;
    /// stop failures are informational, never hard errors.
    pub async fn stop_nodes(&self) -> StopReport {
        let report = lifecycle::stop_nodes(self.runner.as_ref(), &self.nodes).await;
        audit(&self.config.audit_log, "system", "stop", &report.message());
        report
    }

    pub async fn node_status(&self, id: NodeId) -> NodeStatusSnapshot {
        status::node_status(self.runner.as_ref(), self.handle(id)).await
    }

    /// Query both nodes independently; one node's failure has no effect on
    /// the other's snapshot.
    pub async fn status_all(&self) -> StatusAll {
        StatusAll {
            node1: self.node_status(NodeId::One).await,
            node2: self.node_status(NodeId::Two).await,
        }
    }

    /// Mine `count` blocks on node 1 to a fresh address.
    pub async fn generate_blocks(&self, count: u64) -> Result<BlockGenerationResult> {
        let node = self.handle(NodeId::One);
        let result = ops::generate_blocks(self.runner.as_ref(), node, count).await?;
        audit(
            &self.config.audit_log,
            node.id.label(),
            "generate",
            &format!("Generated {} blocks", result.count),
        );
        Ok(result)
    }

    /// Issue a fresh receiving address from the target node's wallet.
    pub async fn new_address(&self, id: NodeId) -> Result<String> {
        ops::new_address(self.runner.as_ref(), self.handle(id)).await
    }

    /// Submit a payment from node 1's default wallet.
    pub async fn send_coins(&self, address: &str, amount: f64) -> Result<String> {
        let node = self.handle(NodeId::One);
        let txid = ops::send_coins(self.runner.as_ref(), node, address, amount).await?;
        audit(
            &self.config.audit_log,
            node.id.label(),
            "send",
            &format!("Sent {} to {}", amount, address),
        );
        Ok(txid)
    }
}
