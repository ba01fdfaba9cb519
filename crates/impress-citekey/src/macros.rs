//! String macro resolution
//!
//! Field values may reference `@string` macros with `#name#` spans. Names are
//! matched case-insensitively; macro content may reference further macros.
//! Unknown names fall back to the standard month abbreviations and are
//! otherwise kept verbatim.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

lazy_static! {
    /// Builtin month macros, used when the table has no entry of the same name
    static ref MONTHS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("jan", "January");
        m.insert("feb", "February");
        m.insert("mar", "March");
        m.insert("apr", "April");
        m.insert("may", "May");
        m.insert("jun", "June");
        m.insert("jul", "July");
        m.insert("aug", "August");
        m.insert("sep", "September");
        m.insert("oct", "October");
        m.insert("nov", "November");
        m.insert("dec", "December");
        m
    };
}

/// A named macro as declared in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringMacro {
    pub name: String,
    pub content: String,
}

/// Database-level macro table, keyed by lowercase name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTable {
    macros: HashMap<String, StringMacro>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a macro. Returns the previous content, if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Option<String> {
        let name = name.into();
        let previous = self.macros.insert(
            name.to_lowercase(),
            StringMacro {
                name,
                content: content.into(),
            },
        );
        previous.map(|m| m.content)
    }

    pub fn with_macro(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<StringMacro> {
        self.macros.remove(&name.to_lowercase())
    }

    pub fn get(&self, name: &str) -> Option<&StringMacro> {
        self.macros.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Resolve every `#name#` span in `text`
    pub fn resolve(&self, text: &str) -> String {
        let mut in_progress = HashSet::new();
        self.resolve_with(text, &mut in_progress)
    }

    /// Resolve `text` while tracking the macro names currently being expanded.
    ///
    /// A name already in `in_progress` is a cycle: its bare label is emitted
    /// instead of expanding it again.
    pub fn resolve_with(&self, text: &str, in_progress: &mut HashSet<String>) -> String {
        if !text.contains('#') {
            return text.to_string();
        }

        let mut result = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find('#') {
            result.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('#') else {
                // Unterminated span
                result.push_str(&rest[start..]);
                return result;
            };

            let label = &after[..end];
            result.push_str(&self.resolve_label(label, in_progress));
            rest = &after[end + 1..];
        }

        result.push_str(rest);
        result
    }

    fn resolve_label(&self, label: &str, in_progress: &mut HashSet<String>) -> String {
        let id = label.to_lowercase();

        if let Some(string_macro) = self.macros.get(&id) {
            if in_progress.contains(&id) {
                tracing::debug!("Macro cycle detected at '{}'", label);
                return label.to_string();
            }
            in_progress.insert(id.clone());
            let resolved = self.resolve_with(&string_macro.content, in_progress);
            in_progress.remove(&id);
            return resolved;
        }

        match MONTHS.get(id.as_str()) {
            Some(month) => month.to_string(),
            None => format!("#{}#", label),
        }
    }
}

/// Full month name for a three-letter abbreviation, if it is one
pub fn month_name(abbreviation: &str) -> Option<&'static str> {
    MONTHS.get(abbreviation.to_lowercase().as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        let table = MacroTable::new();
        assert_eq!(table.resolve("Nothing to see"), "Nothing to see");
    }

    #[test]
    fn test_simple_macro() {
        let table = MacroTable::new().with_macro("jan", "January");
        assert_eq!(table.resolve("#jan# 2020"), "January 2020");
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let table = MacroTable::new().with_macro("ApJ", "Astrophysical Journal");
        assert_eq!(table.resolve("#apj#"), "Astrophysical Journal");
        assert_eq!(table.resolve("#APJ#"), "Astrophysical Journal");
    }

    #[test]
    fn test_nested_macros() {
        let table = MacroTable::new()
            .with_macro("pub", "#org# Press")
            .with_macro("org", "Oxford University");
        assert_eq!(table.resolve("#pub#"), "Oxford University Press");
    }

    #[test]
    fn test_cycle_returns_bare_label() {
        let table = MacroTable::new()
            .with_macro("A", "#B#")
            .with_macro("B", "#A#");
        assert_eq!(table.resolve("#A#"), "A");
    }

    #[test]
    fn test_self_reference() {
        let table = MacroTable::new().with_macro("loop", "x#loop#y");
        assert_eq!(table.resolve("#loop#"), "xloopy");
    }

    #[test]
    fn test_month_fallback() {
        let table = MacroTable::new();
        assert_eq!(table.resolve("#mar#"), "March");
        assert_eq!(month_name("Dec"), Some("December"));
    }

    #[test]
    fn test_table_overrides_month() {
        let table = MacroTable::new().with_macro("jan", "Janvier");
        assert_eq!(table.resolve("#jan#"), "Janvier");
    }

    #[test]
    fn test_unknown_macro_kept() {
        let table = MacroTable::new();
        assert_eq!(table.resolve("a #unknown# b"), "a #unknown# b");
    }

    #[test]
    fn test_unterminated_hash() {
        let table = MacroTable::new().with_macro("x", "X");
        assert_eq!(table.resolve("#x# and #rest"), "X and #rest");
    }

    #[test]
    fn test_insert_returns_previous() {
        let mut table = MacroTable::new();
        assert_eq!(table.insert("a", "1"), None);
        assert_eq!(table.insert("A", "2"), Some("1".to_string()));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("a").map(|m| m.content.as_str()), Some("2"));
    }
}
