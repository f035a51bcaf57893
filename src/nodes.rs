//! Identities and executable paths for the two managed nodes

use std::fmt;
use std::path::{Path, PathBuf};

/// One of the two node slots managed by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    One,
    Two,
}

impl NodeId {
    /// Parse the request-level numeric form (1 or 2).
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(NodeId::One),
            2 => Some(NodeId::Two),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            NodeId::One => 1,
            NodeId::Two => 2,
        }
    }

    /// Label used for audit records and response keys.
    pub fn label(&self) -> &'static str {
        match self {
            NodeId::One => "node1",
            NodeId::Two => "node2",
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable handle for one managed node instance: its data directory and
/// the resolved daemon/client executable paths. Constructed once from
/// configuration; two handles in a session never share a data directory.
#[derive(Debug, Clone)]
pub struct NodeHandle {
    pub id: NodeId,
    pub data_dir: PathBuf,
    pub daemon_path: PathBuf,
    pub cli_path: PathBuf,
}

impl NodeHandle {
    pub fn new(id: NodeId, bin_dir: &Path, data_dir: PathBuf) -> Self {
        Self {
            id,
            data_dir,
            daemon_path: bin_dir.join("bitcoind"),
            cli_path: bin_dir.join("bitcoin-cli"),
        }
    }

    pub fn datadir_arg(&self) -> String {
        format!("-datadir={}", self.data_dir.display())
    }

    /// Build the full client argv for one RPC invocation:
    /// `bitcoin-cli -datadir=<dir> <rpc...>`.
    pub fn cli_args(&self, rpc: &[&str]) -> Vec<String> {
        let mut argv = Vec::with_capacity(rpc.len() + 2);
        argv.push(self.cli_path.display().to_string());
        argv.push(self.datadir_arg());
        argv.extend(rpc.iter().map(|s| s.to_string()));
        argv
    }
}
