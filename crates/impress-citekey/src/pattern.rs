//! Bracketed key patterns
//!
//! A pattern mixes literal text with markers in brackets:
//!
//! ```text
//! [auth][year]            Einstein1905
//! [auth:upper]_[shortyear] EINSTEIN_05
//! \[[year]\]              [1905]
//! [title:(untitled)]      untitled (when there is no title)
//! ```
//!
//! Inside brackets, `:` separates the marker name from its modifiers unless
//! it is escaped or inside parentheses. Quoted text `"..."` is copied
//! verbatim. Parsing never fails: a missing `]` takes the rest of the
//! pattern as the marker body.

use serde::{Deserialize, Serialize};

use crate::database::BibDatabase;
use crate::entry::BibEntry;
use crate::fields::FieldValueResolver;
use crate::modifiers::{apply_modifiers, Modifier};

/// A marker and its modifier chain, e.g. `[auth:lower:(anon)]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub name: String,
    pub modifiers: Vec<Modifier>,
}

impl Marker {
    /// Parse the text between the brackets
    pub fn parse(content: &str) -> Self {
        let mut parts = split_marker(content).into_iter();
        let name = parts.next().unwrap_or_default();
        Self {
            name,
            modifiers: parts.map(|m| Modifier::parse(&m)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Marker(Marker),
}

/// A parsed pattern
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
}

// Patterns travel as their source text
impl Serialize for Pattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Ok(Self::parse(&source))
    }
}

impl Pattern {
    pub fn parse(source: &str) -> Self {
        Self {
            source: source.to_string(),
            tokens: tokenize(source),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Names of all top-level markers, in order
    pub fn marker_names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            Token::Marker(m) => Some(m.name.as_str()),
            Token::Literal(_) => None,
        })
    }

    /// Expand with a marker resolver. Alternate texts are expanded with the
    /// same resolver.
    pub fn expand_with(&self, resolve: &mut dyn FnMut(&str) -> String) -> String {
        let mut result = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => result.push_str(text),
                Token::Marker(marker) => {
                    let value = resolve(marker.name.as_str());
                    let modified =
                        apply_modifiers(&value, &marker.modifiers, &mut |alternate: &str| {
                            Pattern::parse(alternate).expand_with(&mut *resolve)
                        });
                    result.push_str(&modified);
                }
            }
        }
        result
    }

    /// Expand against a record
    pub fn expand(
        &self,
        entry: &BibEntry,
        database: Option<&BibDatabase>,
        keyword_delimiter: char,
    ) -> String {
        let resolver = FieldValueResolver::new(entry, database, keyword_delimiter);
        self.expand_with(&mut |marker: &str| resolver.resolve(marker))
    }
}

/// Expand a pattern string against a record
pub fn expand(
    pattern: &str,
    entry: &BibEntry,
    database: Option<&BibDatabase>,
    keyword_delimiter: char,
) -> String {
    Pattern::parse(pattern).expand(entry, database, keyword_delimiter)
}

// ===== Tokenizer =====

const DELIMITERS: [char; 4] = ['\\', '[', ']', '"'];

/// Split into single delimiter characters and the runs between them
fn lex(source: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut run_start = 0;
    for (i, c) in source.char_indices() {
        if DELIMITERS.contains(&c) {
            if run_start < i {
                pieces.push(&source[run_start..i]);
            }
            pieces.push(&source[i..i + c.len_utf8()]);
            run_start = i + c.len_utf8();
        }
    }
    if run_start < source.len() {
        pieces.push(&source[run_start..]);
    }
    pieces
}

fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut pieces = lex(source).into_iter();

    while let Some(piece) = pieces.next() {
        match piece {
            "\"" => append_quote(&mut literal, &mut pieces),
            "[" => {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                let content = content_between_brackets(&mut pieces, source);
                tokens.push(Token::Marker(Marker::parse(&content)));
            }
            "\\" => match pieces.next() {
                Some(escaped) => literal.push_str(escaped),
                None => tracing::warn!(
                    "Found a '\\' that is not part of an escape sequence in '{}'",
                    source
                ),
            },
            other => literal.push_str(other),
        }
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

/// Copy a quoted run, both quotes included. The opening quote was consumed.
fn append_quote<'a>(out: &mut String, pieces: &mut impl Iterator<Item = &'a str>) {
    out.push('"');
    for piece in pieces.by_ref() {
        out.push_str(piece);
        if piece == "\"" {
            break;
        }
    }
}

/// Everything up to the `]` matching an already consumed `[`
fn content_between_brackets<'a>(
    pieces: &mut impl Iterator<Item = &'a str>,
    source: &str,
) -> String {
    let mut content = String::new();
    let mut depth = 0usize;
    let mut closed = false;

    while let Some(piece) = pieces.next() {
        match piece {
            "\"" => append_quote(&mut content, pieces),
            "]" if depth == 0 => {
                closed = true;
                break;
            }
            "]" => {
                depth -= 1;
                content.push_str(piece);
            }
            "[" => {
                depth += 1;
                content.push_str(piece);
            }
            other => content.push_str(other),
        }
    }

    if !closed {
        tracing::warn!("Missing closing bracket ']' in '{}'", source);
    } else if content.is_empty() {
        tracing::warn!("Found empty brackets \"[]\" in '{}'", source);
    }
    content
}

/// Split marker content on `:` outside parentheses. A backslash escapes the
/// next character; parentheses are kept in the parts.
fn split_marker(content: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    let mut paren_depth = 0usize;

    for c in content.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            ':' if paren_depth == 0 => parts.push(std::mem::take(&mut current)),
            '(' => {
                paren_depth += 1;
                current.push(c);
            }
            ')' if paren_depth > 0 => {
                paren_depth -= 1;
                current.push(c);
            }
            '\\' => escaped = true,
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}
