//! Key occurrence counting
//!
//! The generator asks the tracker how often a candidate key is already in
//! use. Callers keep it in step with the library: add a key when a record
//! is inserted, remove it when a record is deleted, and let
//! [`CiteKeyGenerator::generate_and_set`](crate::generator::CiteKeyGenerator::generate_and_set)
//! update it when a key is replaced.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::entry::BibEntry;

/// Counts how many records carry each key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateKeyTracker {
    counts: HashMap<String, usize>,
}

impl DuplicateKeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker seeded with the current keys of `entries`
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a BibEntry>) -> Self {
        let mut tracker = Self::new();
        for key in entries.into_iter().filter_map(BibEntry::current_key) {
            tracker.add(key);
        }
        tracker
    }

    /// Count one more use of `key`. Returns true if the key was already in use.
    /// Empty keys are not counted.
    pub fn add(&mut self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        let count = self.counts.entry(key.to_string()).or_insert(0);
        *count += 1;
        *count > 1
    }

    /// Count one use of `key` less
    pub fn remove(&mut self, key: &str) {
        if key.is_empty() {
            return;
        }
        match self.counts.get_mut(key) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                self.counts.remove(key);
            }
            None => {
                tracing::error!("Cite key '{}' removed from the tracker but was never added", key);
            }
        }
    }

    /// Number of records carrying `key`
    pub fn occurrences(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.occurrences(key) > 0
    }

    /// Keys carried by more than one record
    pub fn duplicates(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .counts
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

/// A tracker shared between threads. Generate keys against it with
/// [`CiteKeyGenerator::generate_and_set_shared`], which picks and reserves
/// a key under one lock.
///
/// [`CiteKeyGenerator::generate_and_set_shared`]: crate::CiteKeyGenerator::generate_and_set_shared
#[derive(Debug, Default)]
pub struct SharedKeyTracker {
    inner: Mutex<DuplicateKeyTracker>,
}

impl SharedKeyTracker {
    pub fn new(tracker: DuplicateKeyTracker) -> Self {
        Self {
            inner: Mutex::new(tracker),
        }
    }

    /// Lock the tracker. A poisoned lock is recovered; the counts stay valid
    /// because every update is a single map operation.
    pub fn lock(&self) -> MutexGuard<'_, DuplicateKeyTracker> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add(&self, key: &str) -> bool {
        self.lock().add(key)
    }

    pub fn remove(&self, key: &str) {
        self.lock().remove(key)
    }

    pub fn occurrences(&self, key: &str) -> usize {
        self.lock().occurrences(key)
    }

    /// Replace one use of `old` by one use of `new` under a single lock
    pub fn replace(&self, old: Option<&str>, new: &str) {
        let mut tracker = self.lock();
        if let Some(old) = old {
            tracker.remove(old);
        }
        tracker.add(new);
    }

    pub fn into_inner(self) -> DuplicateKeyTracker {
        self.inner.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}
