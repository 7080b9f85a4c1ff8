//! Append-only command log
//!
//! Durability for the keyspace: every successfully dispatched write command
//! is appended to a log file and replayed through the dispatcher at
//! startup. Records are framed exactly like wire requests (RESP arrays of
//! bulk strings), so arguments stay binary-safe and the reader reuses the
//! protocol parser.

mod reader;
mod writer;

pub use reader::AofReader;
pub use writer::AofWriter;

use std::path::PathBuf;

/// When the log file is flushed to stable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Sync after every record (safest, slowest)
    Always,
    /// Sync at most once per second (balanced)
    EverySecond,
    /// Let the OS decide (fastest, least safe)
    No,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        SyncPolicy::EverySecond
    }
}

/// Command-log configuration.
#[derive(Debug, Clone)]
pub struct AofConfig {
    /// Path to the log file
    pub path: PathBuf,
    /// Sync policy
    pub sync_policy: SyncPolicy,
    /// Whether logging is enabled at all
    pub enabled: bool,
}

impl Default for AofConfig {
    fn default() -> Self {
        AofConfig {
            path: PathBuf::from("oredb.aof"),
            sync_policy: SyncPolicy::default(),
            enabled: true,
        }
    }
}
