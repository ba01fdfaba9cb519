//! Cite key generation
//!
//! Expands the pattern for an entry, legalizes the result, applies the
//! optional post-processing regex, and appends a letter suffix when the key
//! is already taken:
//!
//! ```text
//! Einstein1905, Einstein1905a, Einstein1905b, ... Einstein1905z, Einstein1905aa
//! ```
//!
//! Key generation never fails. Configuration errors surface when the
//! generator is built.

use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{KeyGeneratorConfig, KeySuffix};
use crate::database::BibDatabase;
use crate::entry::BibEntry;
use crate::error::Result;
use crate::legalize::clean_key;
use crate::pattern::Pattern;
use crate::patterns::KeyPatterns;
use crate::tracker::{DuplicateKeyTracker, SharedKeyTracker};

const SUFFIX_LETTERS: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Suffix number `n` in base-26 letters: 0 is `a`, 25 is `z`, 26 is `aa`
pub fn letter_suffix(n: usize) -> String {
    let mut suffix = if n >= 26 {
        letter_suffix(n / 26 - 1)
    } else {
        String::new()
    };
    suffix.push(SUFFIX_LETTERS[n % 26] as char);
    suffix
}

/// A key replaced on an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChange {
    pub old_key: Option<String>,
    pub new_key: String,
}

impl KeyChange {
    pub fn is_changed(&self) -> bool {
        self.old_key.as_deref() != Some(self.new_key.as_str())
    }
}

/// Generates cite keys from a validated configuration
#[derive(Debug, Clone)]
pub struct CiteKeyGenerator<'db> {
    config: KeyGeneratorConfig,
    patterns: KeyPatterns,
    key_pattern: Option<(Regex, String)>,
    database: Option<&'db BibDatabase>,
    database_pattern: Option<Pattern>,
}

impl<'db> CiteKeyGenerator<'db> {
    /// Build a generator. Fails if the configuration does not validate.
    pub fn new(config: KeyGeneratorConfig) -> Result<Self> {
        config.validate()?;
        let key_pattern = config.compiled_key_pattern()?;
        Ok(Self {
            patterns: KeyPatterns::from_config(&config),
            config,
            key_pattern,
            database: None,
            database_pattern: None,
        })
    }

    /// Resolve fields against a database: macros, crossref parents and its
    /// default pattern.
    pub fn with_database(mut self, database: &'db BibDatabase) -> Self {
        self.database_pattern = database.default_pattern().map(Pattern::parse);
        self.database = Some(database);
        self
    }

    /// Replace the per-type patterns
    pub fn with_patterns(mut self, patterns: KeyPatterns) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn config(&self) -> &KeyGeneratorConfig {
        &self.config
    }

    pub fn patterns(&self) -> &KeyPatterns {
        &self.patterns
    }

    /// Pattern used for an entry
    pub fn pattern_for(&self, entry: &BibEntry) -> &Pattern {
        self.patterns
            .pattern_for(&entry.entry_type, self.database_pattern.as_ref())
    }

    /// Expanded and legalized key, before any suffix
    pub fn raw_key(&self, entry: &BibEntry) -> String {
        self.raw_key_in(entry, self.database, self.database_pattern.as_ref())
    }

    fn raw_key_in(
        &self,
        entry: &BibEntry,
        database: Option<&BibDatabase>,
        database_pattern: Option<&Pattern>,
    ) -> String {
        let expanded = self
            .patterns
            .pattern_for(&entry.entry_type, database_pattern)
            .expand(entry, database, self.config.keyword_delimiter);
        let cleaned = clean_key(
            &expanded,
            &self.config.unwanted_characters,
            self.config.transliterate,
        );
        match &self.key_pattern {
            Some((regex, replacement)) => {
                regex.replace_all(&cleaned, replacement.as_str()).into_owned()
            }
            None => cleaned,
        }
    }

    /// Key for an entry, unique with respect to `tracker`. The tracker is
    /// not changed.
    pub fn generate_key(&self, entry: &BibEntry, tracker: &DuplicateKeyTracker) -> String {
        let raw = self.raw_key(entry);
        self.disambiguate(&raw, entry.current_key(), tracker)
    }

    /// Generate a key, store it on the entry and update the tracker
    pub fn generate_and_set(
        &self,
        entry: &mut BibEntry,
        tracker: &mut DuplicateKeyTracker,
    ) -> KeyChange {
        let raw = self.raw_key(entry);
        self.assign(entry, raw, tracker)
    }

    /// Like [`generate_and_set`](Self::generate_and_set) against a tracker
    /// shared between threads. The suffix is chosen and reserved under one
    /// lock, so concurrent callers never receive the same key.
    pub fn generate_and_set_shared(
        &self,
        entry: &mut BibEntry,
        tracker: &SharedKeyTracker,
    ) -> KeyChange {
        let raw = self.raw_key(entry);
        let mut guard = tracker.lock();
        self.assign(entry, raw, &mut guard)
    }

    /// Generate keys for a batch. Raw keys are expanded in parallel; suffixes
    /// are assigned in input order so the result is deterministic.
    pub fn generate_all(
        &self,
        entries: &mut [BibEntry],
        tracker: &mut DuplicateKeyTracker,
        mut progress: impl FnMut(usize, usize),
    ) -> Vec<KeyChange> {
        let raw_keys: Vec<String> = entries
            .par_iter()
            .map(|entry| self.raw_key(entry))
            .collect();
        self.assign_all(entries, raw_keys, tracker, &mut progress)
    }

    /// Generate keys for the entries of `database` in place, resolving
    /// macros, crossrefs and the default pattern against that database.
    ///
    /// Raw keys are computed from the database as it is before any key
    /// changes, so a crossref child sees its parent's current key.
    pub fn generate_database(
        &self,
        database: &mut BibDatabase,
        tracker: &mut DuplicateKeyTracker,
        mut progress: impl FnMut(usize, usize),
    ) -> Vec<KeyChange> {
        let raw_keys: Vec<String> = {
            let snapshot: &BibDatabase = database;
            let database_pattern = snapshot.default_pattern().map(Pattern::parse);
            let pattern = database_pattern.as_ref().or(self.database_pattern.as_ref());
            snapshot
                .entries()
                .par_iter()
                .map(|entry| self.raw_key_in(entry, Some(snapshot), pattern))
                .collect()
        };
        self.assign_all(database.entries_mut(), raw_keys, tracker, &mut progress)
    }

    /// Generate a key for the entry at `index` of `database`. Returns `None`
    /// if there is no such entry.
    pub fn generate_database_entry(
        &self,
        database: &mut BibDatabase,
        index: usize,
        tracker: &mut DuplicateKeyTracker,
    ) -> Option<KeyChange> {
        let raw = {
            let snapshot: &BibDatabase = database;
            let entry = snapshot.entries().get(index)?;
            let database_pattern = snapshot.default_pattern().map(Pattern::parse);
            let pattern = database_pattern.as_ref().or(self.database_pattern.as_ref());
            self.raw_key_in(entry, Some(snapshot), pattern)
        };
        let entry = database.entries_mut().get_mut(index)?;
        Some(self.assign(entry, raw, tracker))
    }

    /// Assign suffixed keys in input order
    fn assign_all(
        &self,
        entries: &mut [BibEntry],
        raw_keys: Vec<String>,
        tracker: &mut DuplicateKeyTracker,
        progress: &mut dyn FnMut(usize, usize),
    ) -> Vec<KeyChange> {
        let total = entries.len();
        let mut changes = Vec::with_capacity(total);
        for (done, (entry, raw)) in entries.iter_mut().zip(raw_keys).enumerate() {
            changes.push(self.assign(entry, raw, tracker));
            progress(done + 1, total);
        }
        tracing::info!("Generated {} cite keys", total);
        changes
    }

    fn assign(
        &self,
        entry: &mut BibEntry,
        raw: String,
        tracker: &mut DuplicateKeyTracker,
    ) -> KeyChange {
        let old_key = entry.current_key().map(String::from);
        let new_key = self.disambiguate(&raw, old_key.as_deref(), tracker);

        if let Some(old) = &old_key {
            tracker.remove(old);
        }
        tracker.add(&new_key);
        entry.cite_key = Some(new_key.clone());

        tracing::debug!("Cite key {:?} -> {}", old_key, new_key);
        KeyChange { old_key, new_key }
    }

    /// Uses of `key` by other entries. The entry's own key does not count.
    fn occurrences(key: &str, old_key: Option<&str>, tracker: &DuplicateKeyTracker) -> usize {
        let count = tracker.occurrences(key);
        if old_key == Some(key) {
            count.saturating_sub(1)
        } else {
            count
        }
    }

    fn disambiguate(
        &self,
        key: &str,
        old_key: Option<&str>,
        tracker: &DuplicateKeyTracker,
    ) -> String {
        let always = self.config.key_suffix == KeySuffix::Always;
        if !always && Self::occurrences(key, old_key, tracker) == 0 {
            return key.to_string();
        }

        let start = match self.config.key_suffix {
            KeySuffix::SecondWithB => 1,
            KeySuffix::Always | KeySuffix::SecondWithA => 0,
        };
        // Every tracked key blocks at most one suffix
        let limit = start + tracker.len() + 1;
        for n in start..=limit {
            let candidate = format!("{}{}", key, letter_suffix(n));
            if Self::occurrences(&candidate, old_key, tracker) == 0 {
                return candidate;
            }
        }

        tracing::error!("No free suffix found for cite key '{}'", key);
        format!("{}{}", key, letter_suffix(limit))
    }
}

#[cfg(feature = "uniffi")]
#[uniffi::export]
pub fn generate_cite_key_ffi(
    pattern: String,
    entry_type: String,
    fields: std::collections::HashMap<String, String>,
    existing_keys: Vec<String>,
) -> std::result::Result<String, crate::error::CiteKeyError> {
    let generator =
        CiteKeyGenerator::new(KeyGeneratorConfig::default().with_default_pattern(pattern))?;
    let mut entry = BibEntry::new(crate::entry::EntryType::from_str(&entry_type));
    for (name, value) in fields {
        entry.set_field(name, value);
    }
    let mut tracker = DuplicateKeyTracker::new();
    for key in &existing_keys {
        tracker.add(key);
    }
    Ok(generator.generate_key(&entry, &tracker))
}
