//! Node lifecycle: detached daemon startup and graceful shutdown
//!
//! Start spawns both daemons in the background and returns once the
//! processes exist, not once their RPC servers are ready. Stop issues the
//! graceful `stop` RPC per node and folds failures into an informational
//! report; stopping an already-stopped node is an accepted no-op.

use std::process::{Command, Stdio};

use crate::error::{Result, ServiceError};
use crate::nodes::{NodeHandle, NodeId};
use crate::runner::CommandRunner;

/// Launch one daemon detached, passing its data directory and the
/// background flag. The daemon forks itself; we never wait on readiness.
pub fn spawn_daemon(node: &NodeHandle) -> Result<u32> {
    let mut command = Command::new(&node.daemon_path);
    command
        .arg(node.datadir_arg())
        .arg("-daemon")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let child = command.spawn().map_err(|e| ServiceError::CommandFailed {
        stderr: format!("failed to start {}: {}", node.daemon_path.display(), e),
    })?;

    Ok(child.id())
}

/// Start both nodes. Precondition: the first node's data directory must
/// exist. Re-invocation against already-running nodes is delegated to the
/// daemon's own duplicate-launch handling; no pre-check here.
pub fn start_nodes(nodes: &[NodeHandle; 2]) -> Result<()> {
    let first = &nodes[0];
    if !first.data_dir.exists() {
        return Err(ServiceError::Configuration(format!(
            "Data directory 1 missing: {}",
            first.data_dir.display()
        )));
    }

    for node in nodes {
        let pid = spawn_daemon(node)?;
        tracing::info!(node = %node.id, pid, "daemon spawned");
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// The stop RPC was accepted; the node shuts down on its own.
    Requested,
    /// The stop RPC failed, typically because the node is not running.
    Failed(String),
}

/// Per-node shutdown outcomes, reported as information rather than errors.
#[derive(Debug, Clone)]
pub struct StopReport {
    pub outcomes: Vec<(NodeId, StopOutcome)>,
}

impl StopReport {
    pub fn all_requested(&self) -> bool {
        self.outcomes
            .iter()
            .all(|(_, o)| matches!(o, StopOutcome::Requested))
    }

    /// Human-readable summary for the API response and the audit trail.
    pub fn message(&self) -> String {
        if self.all_requested() {
            return "Nodes stopping".to_string();
        }
        let failures: Vec<String> = self
            .outcomes
            .iter()
            .filter_map(|(id, o)| match o {
                StopOutcome::Failed(text) => Some(format!("{}: {}", id, text)),
                StopOutcome::Requested => None,
            })
            .collect();
        format!(
            "Error stopping (maybe already stopped): {}",
            failures.join("; ")
        )
    }
}

/// Issue a graceful stop to each node in turn. A failure on one node does
/// not prevent the stop request to the other.
pub async fn stop_nodes(runner: &dyn CommandRunner, nodes: &[NodeHandle; 2]) -> StopReport {
    let mut outcomes = Vec::with_capacity(nodes.len());
    for node in nodes {
        match runner.run(&node.cli_args(&["stop"])).await {
            Ok(_) => {
                tracing::info!(node = %node.id, "stop requested");
                outcomes.push((node.id, StopOutcome::Requested));
            }
            Err(e) => {
                tracing::warn!(node = %node.id, error = %e, "stop request failed");
                outcomes.push((node.id, StopOutcome::Failed(e.detail().to_string())));
            }
        }
    }
    StopReport { outcomes }
}
