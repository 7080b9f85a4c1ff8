//! Background expiration sweeper
//!
//! Lazy expiry alone never frees a key that is not read again, so a
//! periodic task walks the keyspace and drops dead entries. It takes the
//! exclusive lock briefly and performs no I/O while holding it.

use super::Keyspace;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Sweep cadence.
const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Spawn the sweeper as a background task. Aborting the returned handle
/// stops it; mid-flight sweeps complete because the lock is held only
/// inside `clear_expired`.
pub fn start_sweeper(keyspace: Arc<Keyspace>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let removed = keyspace.clear_expired();
            if removed > 0 {
                debug!(removed, remaining = keyspace.len(), "swept expired entries");
            }
        }
    })
}
