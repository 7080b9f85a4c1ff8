//! OreDB - a lightweight in-memory multi-type key-value server
//!
//! Speaks RESP2 on the wire and stores five value shapes (string, list,
//! hash, set, sorted set) with per-key expiration. Mutations are appended
//! to a command log and replayed at startup.

pub mod aof;
pub mod commands;
pub mod dispatch;
pub mod protocol;
pub mod server;
pub mod store;

/// Re-export commonly used types
pub use commands::{Command, CommandRegistry};
pub use dispatch::{Dispatcher, Source};
pub use protocol::{RespError, RespValue};
pub use store::{Keyspace, Value};
