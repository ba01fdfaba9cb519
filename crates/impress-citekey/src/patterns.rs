//! Per-type key patterns
//!
//! The pattern for an entry is the one set for its type, else the default
//! of its database, else the global default.

use std::collections::HashMap;

use crate::config::{KeyGeneratorConfig, DEFAULT_PATTERN};
use crate::entry::EntryType;
use crate::pattern::Pattern;

/// Parsed patterns keyed by lowercase entry type name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPatterns {
    default: Pattern,
    by_type: HashMap<String, Pattern>,
}

impl Default for KeyPatterns {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

impl KeyPatterns {
    pub fn new(default_pattern: &str) -> Self {
        Self {
            default: Pattern::parse(default_pattern),
            by_type: HashMap::new(),
        }
    }

    /// Patterns of a configuration. Blank type patterns are skipped.
    pub fn from_config(config: &KeyGeneratorConfig) -> Self {
        let mut patterns = Self::new(&config.default_pattern);
        for (entry_type, pattern) in &config.type_patterns {
            patterns.set_type_pattern(&EntryType::from_str(entry_type), pattern);
        }
        patterns
    }

    pub fn with_type_pattern(mut self, entry_type: &EntryType, pattern: &str) -> Self {
        self.set_type_pattern(entry_type, pattern);
        self
    }

    /// Set or, with a blank pattern, clear the pattern of a type
    pub fn set_type_pattern(&mut self, entry_type: &EntryType, pattern: &str) {
        let key = entry_type.as_str().to_string();
        if pattern.trim().is_empty() {
            self.by_type.remove(&key);
        } else {
            self.by_type.insert(key, Pattern::parse(pattern));
        }
    }

    pub fn default_pattern(&self) -> &Pattern {
        &self.default
    }

    /// Pattern explicitly set for a type
    pub fn type_pattern(&self, entry_type: &EntryType) -> Option<&Pattern> {
        self.by_type.get(entry_type.as_str())
    }

    /// Pattern for an entry type, falling back to `database_default` and
    /// then to the global default
    pub fn pattern_for<'a>(
        &'a self,
        entry_type: &EntryType,
        database_default: Option<&'a Pattern>,
    ) -> &'a Pattern {
        self.type_pattern(entry_type)
            .or(database_default)
            .unwrap_or(&self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_order() {
        let patterns = KeyPatterns::new("[auth][year]")
            .with_type_pattern(&EntryType::Book, "[authors2][year]");
        let database_default = Pattern::parse("[auth3]");

        assert_eq!(
            patterns.pattern_for(&EntryType::Book, Some(&database_default)).source(),
            "[authors2][year]"
        );
        assert_eq!(
            patterns.pattern_for(&EntryType::Article, Some(&database_default)).source(),
            "[auth3]"
        );
        assert_eq!(patterns.pattern_for(&EntryType::Article, None).source(), "[auth][year]");
    }

    #[test]
    fn test_from_config() {
        let config = KeyGeneratorConfig::default()
            .with_type_pattern("InProceedings", "[auth][booktitle]")
            .with_type_pattern("misc", " ");
        let patterns = KeyPatterns::from_config(&config);

        assert_eq!(
            patterns.type_pattern(&EntryType::InProceedings).map(Pattern::source),
            Some("[auth][booktitle]")
        );
        assert!(patterns.type_pattern(&EntryType::Misc).is_none());
    }

    #[test]
    fn test_custom_type() {
        let custom = EntryType::from_str("patent");
        let patterns = KeyPatterns::default().with_type_pattern(&custom, "[number]");
        assert_eq!(patterns.pattern_for(&custom, None).source(), "[number]");
    }

    #[test]
    fn test_blank_pattern_clears() {
        let mut patterns = KeyPatterns::default().with_type_pattern(&EntryType::Book, "[title]");
        patterns.set_type_pattern(&EntryType::Book, "");
        assert_eq!(patterns.pattern_for(&EntryType::Book, None).source(), DEFAULT_PATTERN);
    }
}
