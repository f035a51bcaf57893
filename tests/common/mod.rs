//! Shared test fixtures: a scripted command runner standing in for the
//! external bitcoin-cli, plus canned node responses.
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use regtest_box::config::Config;
use regtest_box::error::{Result, ServiceError};
use regtest_box::runner::CommandRunner;

type Script = dyn Fn(&[String]) -> std::result::Result<String, String> + Send + Sync;

/// A `CommandRunner` that answers from a closure and records every argv it
/// was given, so tests can assert on which commands ran (and how often).
pub struct ScriptedRunner {
    calls: Mutex<Vec<Vec<String>>>,
    script: Box<Script>,
}

impl ScriptedRunner {
    pub fn new<F>(script: F) -> Arc<Self>
    where
        F: Fn(&[String]) -> std::result::Result<String, String> + Send + Sync + 'static,
    {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            script: Box::new(script),
        })
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The RPC verb of each recorded invocation, in order.
    pub fn verbs(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|argv| rpc_verb(argv).to_string())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, argv: &[String]) -> Result<String> {
        self.calls.lock().unwrap().push(argv.to_vec());
        (self.script)(argv).map_err(|stderr| ServiceError::CommandFailed { stderr })
    }
}

/// The RPC verb of one cli invocation: `[bitcoin-cli, -datadir=..., verb, ...]`.
pub fn rpc_verb(argv: &[String]) -> &str {
    argv.get(2).map(|s| s.as_str()).unwrap_or("")
}

/// The `-datadir=` argument of one cli invocation.
pub fn datadir_arg(argv: &[String]) -> &str {
    argv.get(1).map(|s| s.as_str()).unwrap_or("")
}

pub const ADDRESS: &str = "bcrt1qxyztestaddressxxxxxxxxxxxxxxxxxxxxxx";
pub const TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

pub fn chain_info_json() -> String {
    r#"{"chain":"regtest","blocks":101,"headers":101,"difficulty":4.656542373906925e-10,"verificationprogress":1}"#.to_string()
}

pub fn wallet_info_json() -> String {
    r#"{"walletname":"default_wallet","balance":50.0,"txcount":1}"#.to_string()
}

pub fn network_info_json() -> String {
    r#"{"version":210000,"subversion":"/Satoshi:0.21.0/","connections":1}"#.to_string()
}

pub fn block_hashes_json(count: usize) -> String {
    let hashes: Vec<String> = (0..count).map(|i| format!("{:064x}", i + 1)).collect();
    serde_json::to_string(&hashes).unwrap()
}

/// Script a fully healthy node: wallet loaded, all queries answered.
pub fn online_node_script(argv: &[String]) -> std::result::Result<String, String> {
    match rpc_verb(argv) {
        "listwallets" => Ok(r#"["default_wallet"]"#.to_string()),
        "getblockchaininfo" => Ok(chain_info_json()),
        "getwalletinfo" => Ok(wallet_info_json()),
        "getnetworkinfo" => Ok(network_info_json()),
        "getnewaddress" => Ok(ADDRESS.to_string()),
        "generatetoaddress" => {
            let count: usize = argv[3].parse().unwrap();
            Ok(block_hashes_json(count))
        }
        "sendtoaddress" => Ok(TXID.to_string()),
        "stop" => Ok("Bitcoin Core stopping".to_string()),
        other => Err(format!("unexpected RPC: {}", other)),
    }
}

/// Script an unreachable node: every RPC fails the way bitcoin-cli does
/// while the daemon is still starting.
pub fn unreachable_node_script(_argv: &[String]) -> std::result::Result<String, String> {
    Err("error: Could not connect to the server 127.0.0.1:18443".to_string())
}

/// A config rooted inside a temp directory: both data dirs exist, the
/// audit log lands next to them, and the bin dir points at nothing.
pub fn test_config(root: &Path) -> Config {
    let data_dir_1 = root.join("node1");
    let data_dir_2 = root.join("node2");
    std::fs::create_dir_all(&data_dir_1).unwrap();
    std::fs::create_dir_all(&data_dir_2).unwrap();

    Config {
        bin_dir: root.join("bin"),
        data_dir_1,
        data_dir_2,
        api_port: 0,
        command_timeout_secs: 5,
        audit_log: root.join("audit.log"),
    }
}
