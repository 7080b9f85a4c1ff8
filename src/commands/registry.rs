//! Command registry
//!
//! The command table is data: a static array of descriptors indexed into a
//! map at startup. Registration is additive and introspection walks the
//! same table the dispatcher resolves against.

use super::{connection, hash, key, list, set, string, zset, CommandSpec};
use std::collections::HashMap;

static TABLE: &[&CommandSpec] = &[
    &connection::PING,
    &connection::COMMAND,
    &string::GET,
    &string::SET,
    &string::INCR,
    &string::DECR,
    &key::DEL,
    &key::EXISTS,
    &key::EXPIRE,
    &key::TTL,
    &list::LPUSH,
    &list::RPUSH,
    &list::LRANGE,
    &list::LPOP,
    &list::RPOP,
    &list::LLEN,
    &hash::HSET,
    &hash::HGET,
    &hash::HGETALL,
    &hash::HDEL,
    &set::SADD,
    &set::SREM,
    &set::SMEMBERS,
    &set::SISMEMBER,
    &zset::ZADD,
    &zset::ZRANGE,
    &zset::ZREM,
];

pub struct CommandRegistry {
    commands: HashMap<&'static str, &'static CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut commands = HashMap::with_capacity(TABLE.len());
        for spec in TABLE {
            commands.insert(spec.name, *spec);
        }
        CommandRegistry { commands }
    }

    /// Look up a descriptor by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&'static CommandSpec> {
        self.commands.get(name.to_uppercase().as_str()).copied()
    }

    /// Every descriptor, in registration order.
    pub fn specs(&self) -> impl Iterator<Item = &'static CommandSpec> {
        TABLE.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.get("get").map(|s| s.name), Some("GET"));
        assert_eq!(registry.get("GeT").map(|s| s.name), Some("GET"));
        assert!(registry.get("NOPE").is_none());
    }

    #[test]
    fn test_table_has_no_duplicates() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.len(), TABLE.len());
    }

    #[test]
    fn test_full_surface_registered() {
        let registry = CommandRegistry::new();
        for name in [
            "PING", "COMMAND", "GET", "SET", "DEL", "EXISTS", "INCR", "DECR", "EXPIRE", "TTL",
            "LPUSH", "RPUSH", "LRANGE", "LPOP", "RPOP", "LLEN", "HSET", "HGET", "HGETALL",
            "HDEL", "SADD", "SREM", "SMEMBERS", "SISMEMBER", "ZADD", "ZRANGE", "ZREM",
        ] {
            assert!(registry.get(name).is_some(), "{} not registered", name);
        }
    }

    #[test]
    fn test_write_flags_match_mutating_commands() {
        let registry = CommandRegistry::new();
        for spec in registry.specs() {
            let mutates = matches!(
                spec.name,
                "SET" | "DEL" | "INCR" | "DECR" | "EXPIRE" | "LPUSH" | "RPUSH" | "LPOP"
                    | "RPOP" | "HSET" | "HDEL" | "SADD" | "SREM" | "ZADD" | "ZREM"
            );
            assert_eq!(spec.is_write(), mutates, "write flag mismatch on {}", spec.name);
        }
    }
}
