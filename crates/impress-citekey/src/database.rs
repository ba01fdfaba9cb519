//! Record collection with macro table and crossref lookup

use serde::{Deserialize, Serialize};

use crate::entry::BibEntry;
use crate::macros::MacroTable;

/// A collection of records sharing one macro table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BibDatabase {
    entries: Vec<BibEntry>,
    macros: MacroTable,
    /// Database-level default pattern, used when no per-type pattern applies
    default_pattern: Option<String>,
}

impl BibDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_macros(mut self, macros: MacroTable) -> Self {
        self.macros = macros;
        self
    }

    pub fn with_default_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.default_pattern = Some(pattern.into());
        self
    }

    pub fn insert_entry(&mut self, entry: BibEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    pub fn remove_entry(&mut self, index: usize) -> Option<BibEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn entries(&self) -> &[BibEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [BibEntry] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    pub fn macros_mut(&mut self) -> &mut MacroTable {
        &mut self.macros
    }

    pub fn default_pattern(&self) -> Option<&str> {
        self.default_pattern.as_deref().filter(|p| !p.trim().is_empty())
    }

    pub fn set_default_pattern(&mut self, pattern: Option<String>) {
        self.default_pattern = pattern;
    }

    /// Find the entry carrying the given cite key (case-sensitive, as in BibTeX)
    pub fn entry_by_key(&self, key: &str) -> Option<&BibEntry> {
        self.entries
            .iter()
            .find(|e| e.cite_key.as_deref() == Some(key))
    }

    /// Field value with alias, crossref inheritance, and macro resolution applied
    pub fn resolved_field(&self, entry: &BibEntry, name: &str) -> Option<String> {
        let raw = entry.get_field_or_alias(name).or_else(|| {
            if name.eq_ignore_ascii_case("crossref") {
                return None;
            }
            entry
                .crossref()
                .and_then(|parent_key| self.entry_by_key(parent_key))
                .filter(|parent| !std::ptr::eq(*parent, entry))
                .and_then(|parent| parent.get_field_or_alias(name))
        })?;
        Some(self.macros.resolve(&raw))
    }
}
