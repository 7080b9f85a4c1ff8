//! Value union for the keyspace

use super::zset::SortedSet;
use bytes::Bytes;
use std::collections::{HashMap, HashSet, VecDeque};

/// The five value shapes an entry can hold.
///
/// Every entry has exactly one kind; operations bound to a different kind
/// fail with a WRONGTYPE error and leave the entry untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Binary-safe byte string
    String(Bytes),

    /// Ordered sequence with cheap front/back access
    List(VecDeque<Bytes>),

    /// Field -> value mapping
    Hash(HashMap<Bytes, Bytes>),

    /// Unordered set of unique members
    Set(HashSet<Bytes>),

    /// (score, member) collection ordered by score, then member bytes
    SortedSet(SortedSet),
}

impl Value {
    pub fn empty_list() -> Self {
        Value::List(VecDeque::new())
    }

    pub fn empty_hash() -> Self {
        Value::Hash(HashMap::new())
    }

    pub fn empty_set() -> Self {
        Value::Set(HashSet::new())
    }

    pub fn empty_sorted_set() -> Self {
        Value::SortedSet(SortedSet::new())
    }

    /// True when a container value has lost its last element and the
    /// entry should be dropped from the keyspace.
    pub fn is_drained(&self) -> bool {
        match self {
            Value::String(_) => false,
            Value::List(list) => list.is_empty(),
            Value::Hash(hash) => hash.is_empty(),
            Value::Set(set) => set.is_empty(),
            Value::SortedSet(zset) => zset.is_empty(),
        }
    }
}
