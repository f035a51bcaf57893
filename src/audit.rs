//! Audit trail boundary
//!
//! Every mutating operation records one durable, timestamped line. The
//! parent directory is created lazily so the helper stays self-contained.
//! An append failure must never break the operation that emitted it.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::Utc;

/// Append `"<timestamp> - [storage] [action] - message"` to the audit log.
pub fn audit(path: &Path, storage: &str, action: &str, message: &str) {
    if let Err(e) = try_append(path, storage, action, message) {
        tracing::warn!(
            path = %path.display(),
            storage,
            action,
            error = %e,
            "failed to append audit record"
        );
    }
}

fn try_append(path: &Path, storage: &str, action: &str, message: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(
        file,
        "{} - [{}] [{}] - {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        storage,
        action,
        message
    )
}
