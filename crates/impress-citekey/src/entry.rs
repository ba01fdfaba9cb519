//! Bibliographic record data structures
//!
//! A [`BibEntry`] is an ordered list of fields with case-insensitive lookup,
//! an entry type, and an optional cite key. Key generation reads the fields
//! and writes back only the cite key.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Bibliographic entry type
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryType {
    Article,
    Book,
    Booklet,
    InBook,
    InCollection,
    InProceedings,
    Manual,
    MastersThesis,
    #[default]
    Misc,
    PhdThesis,
    Proceedings,
    TechReport,
    Unpublished,
    Online,
    Software,
    Dataset,
    Thesis,
    Report,
    /// Any type without a dedicated variant, stored lowercase
    Other(String),
}

impl EntryType {
    /// Parse an entry type from a string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "article" => Self::Article,
            "book" => Self::Book,
            "booklet" => Self::Booklet,
            "inbook" => Self::InBook,
            "incollection" => Self::InCollection,
            "inproceedings" | "conference" => Self::InProceedings,
            "manual" => Self::Manual,
            "mastersthesis" => Self::MastersThesis,
            "misc" => Self::Misc,
            "phdthesis" => Self::PhdThesis,
            "proceedings" => Self::Proceedings,
            "techreport" => Self::TechReport,
            "unpublished" => Self::Unpublished,
            "online" | "electronic" | "www" => Self::Online,
            "software" => Self::Software,
            "dataset" => Self::Dataset,
            "thesis" => Self::Thesis,
            "report" => Self::Report,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical lowercase name, used to look up per-type patterns
    pub fn as_str(&self) -> &str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::Booklet => "booklet",
            Self::InBook => "inbook",
            Self::InCollection => "incollection",
            Self::InProceedings => "inproceedings",
            Self::Manual => "manual",
            Self::MastersThesis => "mastersthesis",
            Self::Misc => "misc",
            Self::PhdThesis => "phdthesis",
            Self::Proceedings => "proceedings",
            Self::TechReport => "techreport",
            Self::Unpublished => "unpublished",
            Self::Online => "online",
            Self::Software => "software",
            Self::Dataset => "dataset",
            Self::Thesis => "thesis",
            Self::Report => "report",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Display name as produced by the `entrytype` marker, e.g. `InProceedings`
    pub fn display_name(&self) -> String {
        match self {
            Self::Article => "Article".to_string(),
            Self::Book => "Book".to_string(),
            Self::Booklet => "Booklet".to_string(),
            Self::InBook => "InBook".to_string(),
            Self::InCollection => "InCollection".to_string(),
            Self::InProceedings => "InProceedings".to_string(),
            Self::Manual => "Manual".to_string(),
            Self::MastersThesis => "MastersThesis".to_string(),
            Self::Misc => "Misc".to_string(),
            Self::PhdThesis => "PhdThesis".to_string(),
            Self::Proceedings => "Proceedings".to_string(),
            Self::TechReport => "TechReport".to_string(),
            Self::Unpublished => "Unpublished".to_string(),
            Self::Online => "Online".to_string(),
            Self::Software => "Software".to_string(),
            Self::Dataset => "Dataset".to_string(),
            Self::Thesis => "Thesis".to_string(),
            Self::Report => "Report".to_string(),
            Self::Other(name) => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

impl From<String> for EntryType {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl From<EntryType> for String {
    fn from(t: EntryType) -> Self {
        t.as_str().to_string()
    }
}

/// A single field (name-value pair)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryField {
    pub name: String,
    pub value: String,
}

// ===== Field Aliases =====

lazy_static! {
    /// BibTeX and BibLaTeX names for the same field, consulted in both directions
    static ref FIELD_ALIASES: Vec<(&'static str, &'static str)> = vec![
        ("address", "location"),
        ("annote", "annotation"),
        ("archiveprefix", "eprinttype"),
        ("journal", "journaltitle"),
        ("key", "sortkey"),
        ("pdf", "file"),
        ("primaryclass", "eprintclass"),
        ("school", "institution"),
    ];

    static ref DATE_YEAR: Regex = Regex::new(r"^\s*(\d{4})").unwrap();
    static ref DATE_MONTH: Regex = Regex::new(r"^\s*\d{4}-(\d{1,2})").unwrap();
}

/// Returns the alias of a field name, if it has one
pub fn field_alias(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    FIELD_ALIASES.iter().find_map(|(bibtex, biblatex)| {
        if *bibtex == lower {
            Some(*biblatex)
        } else if *biblatex == lower {
            Some(*bibtex)
        } else {
            None
        }
    })
}

/// A bibliographic record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibEntry {
    pub entry_type: EntryType,
    pub cite_key: Option<String>,
    pub fields: Vec<EntryField>,
}

impl BibEntry {
    /// Create an empty entry of the given type
    pub fn new(entry_type: EntryType) -> Self {
        Self {
            entry_type,
            cite_key: None,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn with_cite_key(mut self, key: impl Into<String>) -> Self {
        self.cite_key = Some(key.into());
        self
    }

    pub fn with_type(mut self, entry_type: EntryType) -> Self {
        self.entry_type = entry_type;
        self
    }

    /// Set a field, replacing an existing value with the same name (case-insensitive)
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .fields
            .iter_mut()
            .find(|f| f.name.eq_ignore_ascii_case(&name))
        {
            Some(existing) => existing.value = value,
            None => self.fields.push(EntryField { name, value }),
        }
    }

    /// Remove a field, returning its previous value
    pub fn remove_field(&mut self, name: &str) -> Option<String> {
        let index = self
            .fields
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))?;
        Some(self.fields.remove(index).value)
    }

    /// Get a field value by name (case-insensitive)
    pub fn get_field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(|f| f.value.as_str())
    }

    /// Get a field, falling back to its alias and to values derived from `date`.
    ///
    /// No macro resolution or crossref inheritance happens here; see
    /// [`crate::database::BibDatabase::resolved_field`] for that.
    pub fn get_field_or_alias(&self, name: &str) -> Option<String> {
        if let Some(value) = self.get_field(name) {
            return Some(value.to_string());
        }
        if let Some(alias) = field_alias(name) {
            if let Some(value) = self.get_field(alias) {
                return Some(value.to_string());
            }
        }

        let date = self.get_field("date")?;
        match name.to_lowercase().as_str() {
            "year" => DATE_YEAR.captures(date).map(|c| c[1].to_string()),
            "month" => DATE_MONTH
                .captures(date)
                .and_then(|c| c[1].parse::<u32>().ok())
                .filter(|m| (1..=12).contains(m))
                .map(|m| m.to_string()),
            _ => None,
        }
    }

    /// The key this entry currently carries, if non-empty
    pub fn current_key(&self) -> Option<&str> {
        self.cite_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn crossref(&self) -> Option<&str> {
        self.get_field("crossref").filter(|k| !k.trim().is_empty())
    }
}
