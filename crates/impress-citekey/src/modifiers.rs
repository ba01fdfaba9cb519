//! Marker modifiers
//!
//! A marker value passes through its modifiers left to right:
//! `[auth:upper]`, `[title:abbr]`, `[title:lower:(untitled)]`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::fields::{remove_small_words, title_words};
use crate::latex::decode_latex;

lazy_static! {
    static ref TRUNCATE: Regex = Regex::new(r"^truncate(\d+)$").unwrap();
    static ref CAMEL_N: Regex = Regex::new(r"^camel(\d+)$").unwrap();
}

/// Words kept lower case by `titlecase` unless they open or close the text
const TITLE_CASE_SMALL_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "in", "nor", "of", "on", "or", "the", "to",
    "up", "via",
];

/// Named text transformations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formatter {
    Lower,
    Upper,
    /// Upper-case the first letter of every word, lower-case the rest
    Capitalize,
    TitleCase,
    SentenceCase,
    /// Keep the first N characters
    Truncate(usize),
    LatexToUnicode,
    RemoveBraces,
    /// Remove the braces protecting terms, keeping escaped braces
    UnprotectTerms,
    /// Capitalize every word and join them without spaces
    Camel,
    /// `Camel` over the first N words
    CamelN(usize),
    /// First three significant words, capitalized
    ShortTitle,
    /// First significant word, capitalized
    VeryShortTitle,
}

impl Formatter {
    /// Look up a formatter by modifier name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lower" => Some(Self::Lower),
            "upper" => Some(Self::Upper),
            "capitalize" => Some(Self::Capitalize),
            "titlecase" => Some(Self::TitleCase),
            "sentencecase" => Some(Self::SentenceCase),
            "latex_to_unicode" => Some(Self::LatexToUnicode),
            "remove_braces" => Some(Self::RemoveBraces),
            "unprotect_terms" => Some(Self::UnprotectTerms),
            "camel" => Some(Self::Camel),
            "shorttitle" => Some(Self::ShortTitle),
            "veryshorttitle" => Some(Self::VeryShortTitle),
            _ => {
                if let Some(caps) = TRUNCATE.captures(name) {
                    caps[1].parse().ok().map(Self::Truncate)
                } else {
                    CAMEL_N
                        .captures(name)
                        .and_then(|caps| caps[1].parse().ok())
                        .map(Self::CamelN)
                }
            }
        }
    }

    pub fn format(&self, text: &str) -> String {
        match self {
            Self::Lower => text.to_lowercase(),
            Self::Upper => text.to_uppercase(),
            Self::Capitalize => map_words(text, |_, word| capitalize_word(word)),
            Self::TitleCase => {
                let count = text.split(' ').filter(|w| !w.is_empty()).count();
                map_words(text, |index, word| {
                    let small = TITLE_CASE_SMALL_WORDS.contains(&word.to_lowercase().as_str());
                    if small && index > 0 && index + 1 < count {
                        word.to_lowercase()
                    } else {
                        capitalize_word(word)
                    }
                })
            }
            Self::SentenceCase => map_words(text, |index, word| {
                if index == 0 {
                    capitalize_word(word)
                } else {
                    word.to_lowercase()
                }
            }),
            Self::Truncate(n) => text.chars().take(*n).collect::<String>().trim().to_string(),
            Self::LatexToUnicode => decode_latex(text),
            Self::RemoveBraces => text.chars().filter(|c| *c != '{' && *c != '}').collect(),
            Self::UnprotectTerms => unprotect_terms(text),
            Self::Camel => text.split_whitespace().map(capitalize_word).collect(),
            Self::CamelN(n) => text.split_whitespace().take(*n).map(capitalize_word).collect(),
            Self::ShortTitle => title_words(3, &remove_small_words(text))
                .split(' ')
                .map(capitalize_word)
                .collect::<Vec<_>>()
                .join(" "),
            Self::VeryShortTitle => capitalize_word(&title_words(1, &remove_small_words(text))),
        }
    }
}

/// Apply `f` to every space-separated word, keeping the spacing.
/// Braced words are left alone.
fn map_words(text: &str, mut f: impl FnMut(usize, &str) -> String) -> String {
    let mut index = 0;
    text.split(' ')
        .map(|word| {
            if word.is_empty() {
                return String::new();
            }
            let mapped = if word.starts_with('{') && word.ends_with('}') {
                word.to_string()
            } else {
                f(index, word)
            };
            index += 1;
            mapped
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Drop unescaped braces: `{ACS} Letters` gives `ACS Letters`
fn unprotect_terms(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut escaped = false;
    for c in text.chars() {
        if escaped || (c != '{' && c != '}') {
            result.push(c);
        }
        escaped = c == '\\' && !escaped;
    }
    result
}

/// First character of every word; braces and apostrophes are dropped
/// and words are split at parentheses, spaces, line breaks and quotes.
pub fn abbreviate(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '{' | '}' | '\''))
        .collect::<String>()
        .split(['(', ')', ' ', '\r', '\n', '"'])
        .filter_map(|word| word.chars().next())
        .collect()
}

/// A single modifier of a marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    Abbr,
    Format(Formatter),
    /// Text used when the marker value is empty, itself a pattern.
    /// Holds the text between the parentheses.
    AlternateText(String),
    /// Ignored with a warning
    Unknown(String),
}

impl Modifier {
    pub fn parse(modifier: &str) -> Self {
        if modifier == "abbr" {
            return Self::Abbr;
        }
        if let Some(formatter) = Formatter::from_name(modifier) {
            return Self::Format(formatter);
        }
        match modifier
            .strip_prefix('(')
            .and_then(|inner| inner.strip_suffix(')'))
        {
            Some(inner) => Self::AlternateText(inner.to_string()),
            None => Self::Unknown(modifier.to_string()),
        }
    }
}

/// Apply modifiers to a marker value.
///
/// Alternate text replaces the value only when the marker resolved to `""`
/// and the parentheses are not empty; `expand_alternate` expands it.
pub fn apply_modifiers(
    label: &str,
    modifiers: &[Modifier],
    expand_alternate: &mut dyn FnMut(&str) -> String,
) -> String {
    let mut result = label.to_string();
    for modifier in modifiers {
        match modifier {
            Modifier::Abbr => result = abbreviate(&result),
            Modifier::Format(formatter) => result = formatter.format(&result),
            Modifier::AlternateText(text) => {
                if label.is_empty() && !text.is_empty() {
                    result = expand_alternate(text.as_str());
                }
            }
            Modifier::Unknown(name) => {
                tracing::warn!("Key generator warning: unknown modifier '{}'", name);
            }
        }
    }
    result
}
