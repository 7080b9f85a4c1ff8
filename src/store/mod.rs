//! In-memory keyspace
//!
//! The shared mutable state of the server: a concurrent dictionary of
//! type-tagged entries with per-key expiration.

mod entry;
mod keyspace;
mod sweeper;
mod value;
mod zset;

pub use entry::Entry;
pub use keyspace::{Keyspace, StoreError};
pub use sweeper::start_sweeper;
pub use value::Value;
pub use zset::SortedSet;
