//! Subprocess execution against the external node binaries
//!
//! Commands are always passed as a discrete argument list; nothing is ever
//! concatenated into a shell string. Each invocation runs under an explicit
//! timeout so a hung daemon cannot stall the orchestrator.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::{Result, ServiceError};

/// Seam between orchestration logic and the external command-line tools.
/// The production implementation shells out; tests inject scripted fakes.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Execute `argv[0]` with the remaining arguments and return trimmed
    /// stdout, or `ServiceError::CommandFailed` carrying captured stderr.
    async fn run(&self, argv: &[String]) -> Result<String>;
}

/// Runs one subprocess per call via tokio, capturing stdout and stderr.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(Duration::from_secs(
            crate::config::DEFAULT_COMMAND_TIMEOUT_SECS,
        ))
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, argv: &[String]) -> Result<String> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ServiceError::InvalidInput("empty command line".to_string()))?;

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // reap the child if the timeout drops the wait future
            .kill_on_drop(true);

        let output = match timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ServiceError::CommandFailed {
                    stderr: format!("failed to launch {}: {}", program, e),
                })
            }
            Err(_) => {
                return Err(ServiceError::CommandFailed {
                    stderr: format!(
                        "{} timed out after {} seconds",
                        program,
                        self.timeout.as_secs()
                    ),
                })
            }
        };

        if !output.status.success() {
            return Err(ServiceError::CommandFailed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
