// crates/ruleforge-core/src/diff.rs
// ============================================================================
// Module: Version Diff Engine
// Description: Fingerprint-keyed comparison of two rule snapshots.
// Purpose: Partition rules into added, removed, and unchanged sets.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Each side is indexed by [`Rule::diff_key`]. Keys present only on the right
//! are `added`, keys present only on the left are `removed`, and keys present
//! on both sides are `unchanged` (reported with the left-hand record).
//!
//! ## Invariants
//! - Every key of either side lands in exactly one partition.
//! - Partition order follows first-insertion order of the side it was read
//!   from; a duplicate key keeps its first position but takes the last record.
//! - `unchanged` trusts key equality; field contents are not compared.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::model::Rule;
use crate::model::VersionSnapshot;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Partitioned comparison of two collections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diff<T> {
    /// Records whose key only appears on the right.
    pub added: Vec<T>,
    /// Records whose key only appears on the left.
    pub removed: Vec<T>,
    /// Left-hand records whose key appears on both sides.
    pub unchanged: Vec<T>,
}

impl<T> Diff<T> {
    /// Returns true when neither side has keys the other lacks.
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Rule-set diff.
pub type RuleDiff = Diff<Rule>;

/// Insertion-ordered index where repeated keys overwrite in place.
struct OrderedIndex<K, T> {
    /// Entries in first-insertion order.
    entries: Vec<(K, T)>,
    /// Position of each key in `entries`.
    positions: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone, T> OrderedIndex<K, T> {
    /// Builds the index from a sequence of records.
    fn build<I, F>(records: I, key_of: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> K,
    {
        let mut index = Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        };
        for record in records {
            let key = key_of(&record);
            if let Some(&position) = index.positions.get(&key) {
                index.entries[position].1 = record;
            } else {
                index.positions.insert(key.clone(), index.entries.len());
                index.entries.push((key, record));
            }
        }
        index
    }

    /// Returns true when `key` is indexed.
    fn contains(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }
}

// ============================================================================
// SECTION: Diffing
// ============================================================================

/// Diffs two collections keyed by `key_of`.
#[must_use]
pub fn diff_by_key<T, K, F>(left: &[T], right: &[T], key_of: F) -> Diff<T>
where
    T: Clone,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let left_index = OrderedIndex::build(left.iter().cloned(), &key_of);
    let right_index = OrderedIndex::build(right.iter().cloned(), &key_of);

    let added = right_index
        .entries
        .iter()
        .filter(|(key, _)| !left_index.contains(key))
        .map(|(_, record)| record.clone())
        .collect();
    let mut removed = Vec::new();
    let mut unchanged = Vec::new();
    for (key, record) in left_index.entries {
        if right_index.contains(&key) {
            unchanged.push(record);
        } else {
            removed.push(record);
        }
    }
    Diff {
        added,
        removed,
        unchanged,
    }
}

/// Diffs two rule collections by fingerprint (falling back to id).
#[must_use]
pub fn diff_rules(left: &[Rule], right: &[Rule]) -> RuleDiff {
    diff_by_key(left, right, |rule| rule.diff_key().to_string())
}

/// Diffs two snapshots, left as base and right as compare-to.
#[must_use]
pub fn diff_snapshots(left: &VersionSnapshot, right: &VersionSnapshot) -> RuleDiff {
    diff_rules(&left.rules, &right.rules)
}
