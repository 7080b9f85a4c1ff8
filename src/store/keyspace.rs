//! Concurrent keyspace
//!
//! A single dictionary of type-tagged entries behind a reader-writer lock.
//! Read operations take the shared lock and treat expired entries as
//! missing without deleting them; write operations take the exclusive lock
//! and reap an expired entry before touching its key. Every method appears
//! atomic to callers.

use super::entry::Entry;
use super::value::Value;
use bytes::Bytes;
use siphasher::sip::SipHasher13;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::BuildHasherDefault;
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

type Shard = HashMap<Bytes, Entry, BuildHasherDefault<SipHasher13>>;

/// Failures surfaced by keyspace operations.
///
/// Mapped to client-facing error replies by the command layer; the entry is
/// never mutated when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Operation bound to a different value kind than the entry holds
    WrongType,

    /// String value is not the decimal form of a signed 64-bit integer,
    /// or the arithmetic would overflow
    NotAnInteger,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::WrongType => write!(f, "operation against a key of the wrong kind"),
            StoreError::NotAnInteger => write!(f, "value is not an integer or out of range"),
        }
    }
}

impl std::error::Error for StoreError {}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Clamp an inclusive (start, end) pair with negative tail indexing onto a
/// sequence of length `len`. `None` means the range is empty.
fn clamp_range(start: i64, end: i64, len: usize) -> Option<(usize, usize)> {
    let len = len as i64;
    let mut start = if start < 0 { start + len } else { start };
    let mut end = if end < 0 { end + len } else { end };
    if start < 0 {
        start = 0;
    }
    if end >= len {
        end = len - 1;
    }
    if start > end || start >= len || end < 0 {
        return None;
    }
    Some((start as usize, end as usize))
}

/// Drop the entry for `key` if it is past its deadline. Write paths call
/// this before looking the key up so a dead entry never shadows a create.
fn reap(map: &mut Shard, key: &Bytes, now: u64) {
    if map.get(key).is_some_and(|entry| entry.is_expired(now)) {
        map.remove(key);
    }
}

/// Look up a live entry under the shared lock. Expired entries are reported
/// as missing; their removal is left to the sweeper or a later write.
fn live<'a>(map: &'a Shard, key: &Bytes, now: u64) -> Option<&'a Entry> {
    map.get(key).filter(|entry| !entry.is_expired(now))
}

/// The concurrent, type-tagged dictionary shared by all connections.
pub struct Keyspace {
    map: RwLock<Shard>,
}

impl Keyspace {
    pub fn new() -> Self {
        Keyspace {
            map: RwLock::new(HashMap::with_hasher(BuildHasherDefault::default())),
        }
    }

    // --- generic ---

    /// True iff the key holds a live entry.
    pub fn exists(&self, key: &Bytes) -> bool {
        let map = self.map.read().unwrap();
        live(&map, key, unix_now()).is_some()
    }

    /// Remove the entry; true iff a live entry was removed.
    pub fn del(&self, key: &Bytes) -> bool {
        let mut map = self.map.write().unwrap();
        match map.remove(key) {
            Some(entry) => !entry.is_expired(unix_now()),
            None => false,
        }
    }

    /// Set the deadline to `now + seconds`; true iff the key exists.
    pub fn expire(&self, key: &Bytes, seconds: u64) -> bool {
        let mut map = self.map.write().unwrap();
        let now = unix_now();
        reap(&mut map, key, now);
        match map.get_mut(key) {
            Some(entry) => {
                entry.expires_at = Some(now + seconds);
                true
            }
            None => false,
        }
    }

    /// Remaining TTL in whole seconds; -1 when no deadline, -2 when the key
    /// is missing or expired.
    pub fn ttl(&self, key: &Bytes) -> i64 {
        let map = self.map.read().unwrap();
        match map.get(key) {
            Some(entry) => entry.ttl_seconds(unix_now()),
            None => -2,
        }
    }

    /// Remove every entry past its deadline; returns how many were removed.
    pub fn clear_expired(&self) -> usize {
        let mut map = self.map.write().unwrap();
        let now = unix_now();
        let before = map.len();
        map.retain(|_, entry| !entry.is_expired(now));
        before - map.len()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let map = self.map.read().unwrap();
        let now = unix_now();
        map.values().filter(|entry| !entry.is_expired(now)).count()
    }

    // --- string ---

    /// Unconditional write; any prior deadline is cleared.
    pub fn set(&self, key: Bytes, value: Bytes) {
        let mut map = self.map.write().unwrap();
        map.insert(key, Entry::new(Value::String(value)));
    }

    pub fn get(&self, key: &Bytes) -> Result<Option<Bytes>, StoreError> {
        let map = self.map.read().unwrap();
        match live(&map, key, unix_now()) {
            Some(entry) => match &entry.value {
                Value::String(bytes) => Ok(Some(bytes.clone())),
                _ => Err(StoreError::WrongType),
            },
            None => Ok(None),
        }
    }

    pub fn incr(&self, key: &Bytes) -> Result<i64, StoreError> {
        self.add_to_string(key, 1)
    }

    pub fn decr(&self, key: &Bytes) -> Result<i64, StoreError> {
        self.add_to_string(key, -1)
    }

    /// Shared INCR/DECR path: a missing key starts at "0", and the result
    /// is stored back in decimal form. The deadline is preserved.
    fn add_to_string(&self, key: &Bytes, delta: i64) -> Result<i64, StoreError> {
        let mut map = self.map.write().unwrap();
        let now = unix_now();
        reap(&mut map, key, now);
        let entry = map
            .entry(key.clone())
            .or_insert_with(|| Entry::new(Value::String(Bytes::from_static(b"0"))));
        match &mut entry.value {
            Value::String(bytes) => {
                let current: i64 = std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or(StoreError::NotAnInteger)?;
                let next = current.checked_add(delta).ok_or(StoreError::NotAnInteger)?;
                *bytes = Bytes::from(next.to_string());
                Ok(next)
            }
            _ => Err(StoreError::WrongType),
        }
    }

    // --- list ---

    pub fn lpush(&self, key: &Bytes, values: &[Bytes]) -> Result<usize, StoreError> {
        let mut map = self.map.write().unwrap();
        let now = unix_now();
        reap(&mut map, key, now);
        let entry = map
            .entry(key.clone())
            .or_insert_with(|| Entry::new(Value::empty_list()));
        match &mut entry.value {
            Value::List(list) => {
                for value in values {
                    list.push_front(value.clone());
                }
                Ok(list.len())
            }
            _ => Err(StoreError::WrongType),
        }
    }

    pub fn rpush(&self, key: &Bytes, values: &[Bytes]) -> Result<usize, StoreError> {
        let mut map = self.map.write().unwrap();
        let now = unix_now();
        reap(&mut map, key, now);
        let entry = map
            .entry(key.clone())
            .or_insert_with(|| Entry::new(Value::empty_list()));
        match &mut entry.value {
            Value::List(list) => {
                for value in values {
                    list.push_back(value.clone());
                }
                Ok(list.len())
            }
            _ => Err(StoreError::WrongType),
        }
    }

    /// Pop up to `count` elements from the front, in removal order.
    pub fn lpop(&self, key: &Bytes, count: usize) -> Result<Vec<Bytes>, StoreError> {
        self.pop(key, count, VecDeque::pop_front)
    }

    /// Pop up to `count` elements from the back, in removal order.
    pub fn rpop(&self, key: &Bytes, count: usize) -> Result<Vec<Bytes>, StoreError> {
        self.pop(key, count, VecDeque::pop_back)
    }

    fn pop(
        &self,
        key: &Bytes,
        count: usize,
        take_one: fn(&mut VecDeque<Bytes>) -> Option<Bytes>,
    ) -> Result<Vec<Bytes>, StoreError> {
        let mut map = self.map.write().unwrap();
        let now = unix_now();
        reap(&mut map, key, now);
        let Some(entry) = map.get_mut(key) else {
            return Ok(Vec::new());
        };
        let Value::List(list) = &mut entry.value else {
            return Err(StoreError::WrongType);
        };
        let mut popped = Vec::with_capacity(count.min(list.len()));
        while popped.len() < count {
            match take_one(list) {
                Some(value) => popped.push(value),
                None => break,
            }
        }
        if entry.value.is_drained() {
            map.remove(key);
        }
        Ok(popped)
    }

    /// Inclusive range with negative tail indexing; out-of-range indices
    /// are clamped, an inverted range is empty.
    pub fn lrange(&self, key: &Bytes, start: i64, end: i64) -> Result<Vec<Bytes>, StoreError> {
        let map = self.map.read().unwrap();
        let Some(entry) = live(&map, key, unix_now()) else {
            return Ok(Vec::new());
        };
        let Value::List(list) = &entry.value else {
            return Err(StoreError::WrongType);
        };
        let Some((start, end)) = clamp_range(start, end, list.len()) else {
            return Ok(Vec::new());
        };
        Ok(list.iter().skip(start).take(end - start + 1).cloned().collect())
    }

    pub fn llen(&self, key: &Bytes) -> Result<usize, StoreError> {
        let map = self.map.read().unwrap();
        match live(&map, key, unix_now()) {
            Some(entry) => match &entry.value {
                Value::List(list) => Ok(list.len()),
                _ => Err(StoreError::WrongType),
            },
            None => Ok(0),
        }
    }

    // --- hash ---

    /// Add or overwrite fields; only newly created fields are counted.
    pub fn hset(&self, key: &Bytes, pairs: &[(Bytes, Bytes)]) -> Result<usize, StoreError> {
        let mut map = self.map.write().unwrap();
        let now = unix_now();
        reap(&mut map, key, now);
        let entry = map
            .entry(key.clone())
            .or_insert_with(|| Entry::new(Value::empty_hash()));
        match &mut entry.value {
            Value::Hash(hash) => {
                let mut created = 0;
                for (field, value) in pairs {
                    if hash.insert(field.clone(), value.clone()).is_none() {
                        created += 1;
                    }
                }
                Ok(created)
            }
            _ => Err(StoreError::WrongType),
        }
    }

    pub fn hget(&self, key: &Bytes, field: &Bytes) -> Result<Option<Bytes>, StoreError> {
        let map = self.map.read().unwrap();
        match live(&map, key, unix_now()) {
            Some(entry) => match &entry.value {
                Value::Hash(hash) => Ok(hash.get(field).cloned()),
                _ => Err(StoreError::WrongType),
            },
            None => Ok(None),
        }
    }

    /// Every (field, value) pair; empty when the key is missing.
    pub fn hgetall(&self, key: &Bytes) -> Result<Vec<(Bytes, Bytes)>, StoreError> {
        let map = self.map.read().unwrap();
        match live(&map, key, unix_now()) {
            Some(entry) => match &entry.value {
                Value::Hash(hash) => Ok(hash
                    .iter()
                    .map(|(field, value)| (field.clone(), value.clone()))
                    .collect()),
                _ => Err(StoreError::WrongType),
            },
            None => Ok(Vec::new()),
        }
    }

    pub fn hdel(&self, key: &Bytes, fields: &[Bytes]) -> Result<usize, StoreError> {
        let mut map = self.map.write().unwrap();
        let now = unix_now();
        reap(&mut map, key, now);
        let Some(entry) = map.get_mut(key) else {
            return Ok(0);
        };
        let Value::Hash(hash) = &mut entry.value else {
            return Err(StoreError::WrongType);
        };
        let mut removed = 0;
        for field in fields {
            if hash.remove(field).is_some() {
                removed += 1;
            }
        }
        if entry.value.is_drained() {
            map.remove(key);
        }
        Ok(removed)
    }

    // --- set ---

    pub fn sadd(&self, key: &Bytes, members: &[Bytes]) -> Result<usize, StoreError> {
        let mut map = self.map.write().unwrap();
        let now = unix_now();
        reap(&mut map, key, now);
        let entry = map
            .entry(key.clone())
            .or_insert_with(|| Entry::new(Value::empty_set()));
        match &mut entry.value {
            Value::Set(set) => {
                let mut added = 0;
                for member in members {
                    if set.insert(member.clone()) {
                        added += 1;
                    }
                }
                Ok(added)
            }
            _ => Err(StoreError::WrongType),
        }
    }

    pub fn srem(&self, key: &Bytes, members: &[Bytes]) -> Result<usize, StoreError> {
        let mut map = self.map.write().unwrap();
        let now = unix_now();
        reap(&mut map, key, now);
        let Some(entry) = map.get_mut(key) else {
            return Ok(0);
        };
        let Value::Set(set) = &mut entry.value else {
            return Err(StoreError::WrongType);
        };
        let mut removed = 0;
        for member in members {
            if set.remove(member) {
                removed += 1;
            }
        }
        if entry.value.is_drained() {
            map.remove(key);
        }
        Ok(removed)
    }

    /// All members, in unspecified order; empty when the key is missing.
    pub fn smembers(&self, key: &Bytes) -> Result<Vec<Bytes>, StoreError> {
        let map = self.map.read().unwrap();
        match live(&map, key, unix_now()) {
            Some(entry) => match &entry.value {
                Value::Set(set) => Ok(set.iter().cloned().collect()),
                _ => Err(StoreError::WrongType),
            },
            None => Ok(Vec::new()),
        }
    }

    pub fn sismember(&self, key: &Bytes, member: &Bytes) -> Result<bool, StoreError> {
        let map = self.map.read().unwrap();
        match live(&map, key, unix_now()) {
            Some(entry) => match &entry.value {
                Value::Set(set) => Ok(set.contains(member)),
                _ => Err(StoreError::WrongType),
            },
            None => Ok(false),
        }
    }

    // --- sorted set ---

    /// Insert members or update the scores of existing ones; only inserts
    /// are counted.
    pub fn zadd(&self, key: &Bytes, pairs: &[(f64, Bytes)]) -> Result<usize, StoreError> {
        let mut map = self.map.write().unwrap();
        let now = unix_now();
        reap(&mut map, key, now);
        let entry = map
            .entry(key.clone())
            .or_insert_with(|| Entry::new(Value::empty_sorted_set()));
        match &mut entry.value {
            Value::SortedSet(zset) => {
                let mut added = 0;
                for (score, member) in pairs {
                    if zset.add(*score, member.clone()) {
                        added += 1;
                    }
                }
                Ok(added)
            }
            _ => Err(StoreError::WrongType),
        }
    }

    /// Rank range over the sorted order, clamped like `lrange`.
    pub fn zrange(
        &self,
        key: &Bytes,
        start: i64,
        end: i64,
    ) -> Result<Vec<(f64, Bytes)>, StoreError> {
        let map = self.map.read().unwrap();
        let Some(entry) = live(&map, key, unix_now()) else {
            return Ok(Vec::new());
        };
        let Value::SortedSet(zset) = &entry.value else {
            return Err(StoreError::WrongType);
        };
        let Some((start, end)) = clamp_range(start, end, zset.len()) else {
            return Ok(Vec::new());
        };
        Ok(zset
            .iter()
            .skip(start)
            .take(end - start + 1)
            .map(|(score, member)| (score, member.clone()))
            .collect())
    }

    pub fn zrem(&self, key: &Bytes, members: &[Bytes]) -> Result<usize, StoreError> {
        let mut map = self.map.write().unwrap();
        let now = unix_now();
        reap(&mut map, key, now);
        let Some(entry) = map.get_mut(key) else {
            return Ok(0);
        };
        let Value::SortedSet(zset) = &mut entry.value else {
            return Err(StoreError::WrongType);
        };
        let mut removed = 0;
        for member in members {
            if zset.remove(member) {
                removed += 1;
            }
        }
        if entry.value.is_drained() {
            map.remove(key);
        }
        Ok(removed)
    }
}

impl Default for Keyspace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(s: &str) -> Bytes {
        Bytes::copy_from_slice(s.as_bytes())
    }

    #[test]
    fn test_set_get() {
        let ks = Keyspace::new();
        ks.set(b("key"), b("value"));
        assert_eq!(ks.get(&b("key")).unwrap(), Some(b("value")));
        assert_eq!(ks.get(&b("missing")).unwrap(), None);
    }

    #[test]
    fn test_get_wrong_kind() {
        let ks = Keyspace::new();
        ks.lpush(&b("list"), &[b("a")]).unwrap();
        assert_eq!(ks.get(&b("list")), Err(StoreError::WrongType));
        // the entry is untouched
        assert_eq!(ks.llen(&b("list")).unwrap(), 1);
    }

    #[test]
    fn test_del_and_exists() {
        let ks = Keyspace::new();
        ks.set(b("key"), b("value"));
        assert!(ks.exists(&b("key")));
        assert!(ks.del(&b("key")));
        assert!(!ks.del(&b("key")));
        assert!(!ks.exists(&b("key")));
        assert_eq!(ks.ttl(&b("key")), -2);
    }

    #[test]
    fn test_incr_decr() {
        let ks = Keyspace::new();
        assert_eq!(ks.incr(&b("n")).unwrap(), 1);
        assert_eq!(ks.incr(&b("n")).unwrap(), 2);
        assert_eq!(ks.decr(&b("n")).unwrap(), 1);
        assert_eq!(ks.get(&b("n")).unwrap(), Some(b("1")));

        // decr on a missing key starts from "0"
        assert_eq!(ks.decr(&b("m")).unwrap(), -1);
    }

    #[test]
    fn test_incr_non_integer() {
        let ks = Keyspace::new();
        ks.set(b("s"), b("not a number"));
        assert_eq!(ks.incr(&b("s")), Err(StoreError::NotAnInteger));
        // failed increment must not mutate
        assert_eq!(ks.get(&b("s")).unwrap(), Some(b("not a number")));
    }

    #[test]
    fn test_incr_overflow() {
        let ks = Keyspace::new();
        ks.set(b("n"), Bytes::from(i64::MAX.to_string()));
        assert_eq!(ks.incr(&b("n")), Err(StoreError::NotAnInteger));
        assert_eq!(ks.get(&b("n")).unwrap(), Some(Bytes::from(i64::MAX.to_string())));
    }

    #[test]
    fn test_incr_wrong_kind() {
        let ks = Keyspace::new();
        ks.sadd(&b("set"), &[b("x")]).unwrap();
        assert_eq!(ks.incr(&b("set")), Err(StoreError::WrongType));
    }

    #[test]
    fn test_lpush_order() {
        let ks = Keyspace::new();
        assert_eq!(ks.lpush(&b("l"), &[b("a"), b("b"), b("c")]).unwrap(), 3);
        assert_eq!(
            ks.lrange(&b("l"), 0, -1).unwrap(),
            vec![b("c"), b("b"), b("a")]
        );
    }

    #[test]
    fn test_rpush_order() {
        let ks = Keyspace::new();
        assert_eq!(ks.rpush(&b("l"), &[b("a"), b("b"), b("c")]).unwrap(), 3);
        assert_eq!(
            ks.lrange(&b("l"), 0, -1).unwrap(),
            vec![b("a"), b("b"), b("c")]
        );
    }

    #[test]
    fn test_lrange_clamping() {
        let ks = Keyspace::new();
        ks.rpush(&b("l"), &[b("a"), b("b"), b("c"), b("d"), b("e")])
            .unwrap();

        assert_eq!(ks.lrange(&b("l"), 1, 3).unwrap(), vec![b("b"), b("c"), b("d")]);
        assert_eq!(ks.lrange(&b("l"), -2, -1).unwrap(), vec![b("d"), b("e")]);
        assert_eq!(ks.lrange(&b("l"), 0, 100).unwrap().len(), 5);
        assert_eq!(ks.lrange(&b("l"), -100, 0).unwrap(), vec![b("a")]);
        assert!(ks.lrange(&b("l"), 3, 1).unwrap().is_empty());
        assert!(ks.lrange(&b("l"), 9, 12).unwrap().is_empty());
        assert!(ks.lrange(&b("missing"), 0, -1).unwrap().is_empty());
    }

    #[test]
    fn test_lpop_rpop() {
        let ks = Keyspace::new();
        ks.rpush(&b("l"), &[b("a"), b("b"), b("c")]).unwrap();

        assert_eq!(ks.lpop(&b("l"), 1).unwrap(), vec![b("a")]);
        // removal order from the back: last element first
        assert_eq!(ks.rpop(&b("l"), 2).unwrap(), vec![b("c"), b("b")]);

        // list drained, entry gone
        assert!(!ks.exists(&b("l")));
        assert!(ks.lpop(&b("l"), 1).unwrap().is_empty());
    }

    #[test]
    fn test_pop_count_exceeds_length() {
        let ks = Keyspace::new();
        ks.rpush(&b("l"), &[b("a"), b("b")]).unwrap();
        assert_eq!(ks.lpop(&b("l"), 10).unwrap(), vec![b("a"), b("b")]);
        assert!(!ks.exists(&b("l")));
    }

    #[test]
    fn test_llen() {
        let ks = Keyspace::new();
        assert_eq!(ks.llen(&b("l")).unwrap(), 0);
        ks.rpush(&b("l"), &[b("a"), b("b")]).unwrap();
        assert_eq!(ks.llen(&b("l")).unwrap(), 2);
        ks.set(b("s"), b("v"));
        assert_eq!(ks.llen(&b("s")), Err(StoreError::WrongType));
    }

    #[test]
    fn test_hset_counts_new_fields_only() {
        let ks = Keyspace::new();
        assert_eq!(
            ks.hset(&b("h"), &[(b("f1"), b("v1")), (b("f2"), b("v2"))])
                .unwrap(),
            2
        );
        // overwrite counts zero but applies the new value
        assert_eq!(ks.hset(&b("h"), &[(b("f1"), b("v1b"))]).unwrap(), 0);
        assert_eq!(ks.hget(&b("h"), &b("f1")).unwrap(), Some(b("v1b")));
    }

    #[test]
    fn test_hgetall_missing_is_empty() {
        let ks = Keyspace::new();
        assert!(ks.hgetall(&b("missing")).unwrap().is_empty());
    }

    #[test]
    fn test_hdel_drains_entry() {
        let ks = Keyspace::new();
        ks.hset(&b("h"), &[(b("f1"), b("v1")), (b("f2"), b("v2"))])
            .unwrap();
        assert_eq!(ks.hdel(&b("h"), &[b("f1"), b("nope")]).unwrap(), 1);
        assert!(ks.exists(&b("h")));
        assert_eq!(ks.hdel(&b("h"), &[b("f2")]).unwrap(), 1);
        assert!(!ks.exists(&b("h")));
    }

    #[test]
    fn test_sadd_dedup() {
        let ks = Keyspace::new();
        assert_eq!(ks.sadd(&b("s"), &[b("a"), b("b"), b("a")]).unwrap(), 2);
        let mut members = ks.smembers(&b("s")).unwrap();
        members.sort();
        assert_eq!(members, vec![b("a"), b("b")]);
        assert!(ks.sismember(&b("s"), &b("a")).unwrap());
        assert!(!ks.sismember(&b("s"), &b("c")).unwrap());
    }

    #[test]
    fn test_srem_drains_entry() {
        let ks = Keyspace::new();
        ks.sadd(&b("s"), &[b("a"), b("b")]).unwrap();
        assert_eq!(ks.srem(&b("s"), &[b("a"), b("b"), b("c")]).unwrap(), 2);
        assert!(!ks.exists(&b("s")));
        assert_eq!(ks.srem(&b("s"), &[b("a")]).unwrap(), 0);
    }

    #[test]
    fn test_zadd_and_zrange() {
        let ks = Keyspace::new();
        assert_eq!(
            ks.zadd(
                &b("z"),
                &[(1.0, b("one")), (2.0, b("two")), (1.0, b("one"))]
            )
            .unwrap(),
            2
        );

        // score update is not counted but reorders
        assert_eq!(ks.zadd(&b("z"), &[(3.0, b("one"))]).unwrap(), 0);
        assert_eq!(
            ks.zrange(&b("z"), 0, -1).unwrap(),
            vec![(2.0, b("two")), (3.0, b("one"))]
        );
    }

    #[test]
    fn test_zrange_clamping() {
        let ks = Keyspace::new();
        ks.zadd(&b("z"), &[(1.0, b("a")), (2.0, b("b")), (3.0, b("c"))])
            .unwrap();
        assert_eq!(
            ks.zrange(&b("z"), -2, 100).unwrap(),
            vec![(2.0, b("b")), (3.0, b("c"))]
        );
        assert!(ks.zrange(&b("z"), 5, 9).unwrap().is_empty());
        assert!(ks.zrange(&b("missing"), 0, -1).unwrap().is_empty());
    }

    #[test]
    fn test_zrem_drains_entry() {
        let ks = Keyspace::new();
        ks.zadd(&b("z"), &[(1.0, b("a")), (2.0, b("b"))]).unwrap();
        assert_eq!(ks.zrem(&b("z"), &[b("a"), b("x")]).unwrap(), 1);
        assert_eq!(ks.zrem(&b("z"), &[b("b")]).unwrap(), 1);
        assert!(!ks.exists(&b("z")));
    }

    #[test]
    fn test_wrong_kind_never_mutates() {
        let ks = Keyspace::new();
        ks.set(b("s"), b("v"));
        assert_eq!(ks.lpush(&b("s"), &[b("x")]), Err(StoreError::WrongType));
        assert_eq!(ks.hset(&b("s"), &[(b("f"), b("v"))]), Err(StoreError::WrongType));
        assert_eq!(ks.sadd(&b("s"), &[b("x")]), Err(StoreError::WrongType));
        assert_eq!(ks.zadd(&b("s"), &[(1.0, b("x"))]), Err(StoreError::WrongType));
        assert_eq!(ks.get(&b("s")).unwrap(), Some(b("v")));
    }

    #[test]
    fn test_set_clears_ttl() {
        let ks = Keyspace::new();
        ks.set(b("k"), b("v1"));
        assert!(ks.expire(&b("k"), 100));
        assert!(ks.ttl(&b("k")) > 0);

        ks.set(b("k"), b("v2"));
        assert_eq!(ks.ttl(&b("k")), -1);
    }

    #[test]
    fn test_expire_missing_key() {
        let ks = Keyspace::new();
        assert!(!ks.expire(&b("missing"), 10));
    }

    #[test]
    fn test_ttl_reporting() {
        let ks = Keyspace::new();
        ks.set(b("k"), b("v"));
        assert_eq!(ks.ttl(&b("k")), -1);
        ks.expire(&b("k"), 100);
        let ttl = ks.ttl(&b("k"));
        assert!((99..=100).contains(&ttl), "ttl was {}", ttl);
    }

    #[test]
    fn test_expiration_observed_lazily() {
        let ks = Keyspace::new();
        ks.set(b("k"), b("v"));
        ks.expire(&b("k"), 0);

        std::thread::sleep(std::time::Duration::from_secs(2));

        assert!(!ks.exists(&b("k")));
        assert_eq!(ks.get(&b("k")).unwrap(), None);
        assert_eq!(ks.ttl(&b("k")), -2);

        // sweep actually removes it
        assert_eq!(ks.clear_expired(), 1);
        assert_eq!(ks.clear_expired(), 0);
    }

    #[test]
    fn test_write_reaps_expired_entry() {
        let ks = Keyspace::new();
        ks.set(b("k"), b("v"));
        ks.expire(&b("k"), 0);

        std::thread::sleep(std::time::Duration::from_secs(2));

        // the dead string must not WRONGTYPE a list create
        assert_eq!(ks.lpush(&b("k"), &[b("a")]).unwrap(), 1);
        assert_eq!(ks.ttl(&b("k")), -1);
    }
}
