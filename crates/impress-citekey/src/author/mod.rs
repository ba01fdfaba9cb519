//! Author and editor names
//!
//! A raw name field is parsed into an [`AuthorList`]. For key generation
//! every name is first classified as a person or an institution
//! ([`Contributor`]); institutions are replaced by their short key and
//! person name parts are LaTeX-decoded.

pub mod format;
pub mod institution;
mod parser;

use serde::{Deserialize, Serialize};

use crate::latex::decode_latex;

/// A single parsed name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub first: Option<String>,
    /// First name initials, e.g. `J.-P.`
    pub first_abbr: Option<String>,
    pub von: Option<String>,
    pub last: Option<String>,
    pub jr: Option<String>,
}

impl Author {
    /// Von part and last name, e.g. `van der Aalst`
    pub fn last_only(&self) -> String {
        match (&self.von, &self.last) {
            (Some(von), Some(last)) => format!("{} {}", von, last),
            (Some(von), None) => von.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        }
    }

    fn is_others(&self) -> bool {
        self.first.is_none() && self.von.is_none() && self.last.as_deref() == Some("others")
    }
}

/// Ordered names of one field, with the "et al." marker split off
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorList {
    pub authors: Vec<Author>,
    /// The list ended with `and others`
    pub et_al: bool,
}

impl AuthorList {
    /// Parse a raw field structurally, keeping LaTeX markup as written
    pub fn parse(field: &str) -> Self {
        let mut authors = parser::parse_names(field);
        let et_al = authors.last().is_some_and(Author::is_others);
        if et_al {
            authors.pop();
        }
        Self { authors, et_al }
    }

    /// Parse a field into the form used by the author markers
    pub fn for_keys(field: &str) -> Self {
        let parsed = Self::parse(field);
        Self {
            authors: parsed
                .authors
                .into_iter()
                .map(|author| Contributor::classify(author).into_key_author())
                .collect(),
            et_al: parsed.et_al,
        }
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    /// Name at a 0-based position
    pub fn get(&self, index: usize) -> Option<&Author> {
        self.authors.get(index)
    }
}

/// A parsed name, classified as a person or an organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contributor {
    Person(Author),
    /// Raw braced institution name, e.g. `{Linköping University}`
    Institution(String),
}

impl Contributor {
    /// A name with only a last part that contains whitespace is an institution
    pub fn classify(author: Author) -> Self {
        let only_last = author.first.is_none()
            && author.first_abbr.is_none()
            && author.von.is_none()
            && author.jr.is_none();
        match author.last {
            Some(last) if only_last && last.contains(char::is_whitespace) => {
                Self::Institution(last)
            }
            _ => Self::Person(author),
        }
    }

    /// Convert into the name used for keys: institutions become their
    /// institution key, person name parts are decoded.
    pub fn into_key_author(self) -> Author {
        match self {
            Self::Institution(name) => Author {
                last: Some(institution::institution_key(&name)),
                ..Author::default()
            },
            Self::Person(author) => Author {
                first: author.first.as_deref().map(decode_latex),
                first_abbr: author.first_abbr.as_deref().map(decode_latex),
                von: author.von.as_deref().map(decode_latex),
                last: author.last.as_deref().map(decode_latex),
                jr: author.jr.as_deref().map(decode_latex),
            },
        }
    }
}
