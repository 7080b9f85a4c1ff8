//! Sorted-set value type
//!
//! Dual-indexed: a `BTreeSet` over `(score, member)` gives ordered
//! iteration in O(log n) per mutation, and a member -> score map gives O(1)
//! lookup when a ZADD updates an existing member. Ordering is score
//! ascending with ties broken by member bytes ascending.

use bytes::Bytes;
use ordered_float::OrderedFloat;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedSet {
    ordered: BTreeSet<(OrderedFloat<f64>, Bytes)>,
    scores: HashMap<Bytes, OrderedFloat<f64>>,
}

impl SortedSet {
    pub fn new() -> Self {
        SortedSet::default()
    }

    /// Insert a member or update its score.
    ///
    /// Returns `true` iff the member was newly added; a score update on an
    /// existing member returns `false`.
    pub fn add(&mut self, score: f64, member: Bytes) -> bool {
        let score = OrderedFloat(score);
        match self.scores.insert(member.clone(), score) {
            Some(previous) => {
                if previous != score {
                    self.ordered.remove(&(previous, member.clone()));
                    self.ordered.insert((score, member));
                }
                false
            }
            None => {
                self.ordered.insert((score, member));
                true
            }
        }
    }

    /// Remove a member; returns `true` iff it was present.
    pub fn remove(&mut self, member: &Bytes) -> bool {
        match self.scores.remove(member) {
            Some(score) => {
                self.ordered.remove(&(score, member.clone()));
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// (score, member) pairs in rank order, lowest score first.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &Bytes)> {
        self.ordered.iter().map(|(score, member)| (score.0, member))
    }
}
