//! RESP2 protocol implementation
//!
//! Parsing and encoding of the Redis Serialization Protocol (RESP2).
//! This module has no knowledge of the keyspace or command layer.

mod resp;
mod types;

pub use resp::{RespEncoder, RespParser};
pub use types::{RespError, RespValue};
