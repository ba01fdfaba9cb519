//! Marker resolution
//!
//! Maps a marker name such as `auth`, `shorttitle` or `authIni4` to its
//! value for one record. Fixed names are looked up in tables built once;
//! numbered markers (`auth3`, `edtr2_1`, `keyword2`) are matched against a
//! list of name patterns. Anything else is read as a plain field.
//!
//! Resolution never fails. Missing data yields `""`.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;

use crate::author::format::{self, truncate_chars};
use crate::author::AuthorList;
use crate::database::BibDatabase;
use crate::entry::BibEntry;
use crate::latex::decode_latex;
use crate::modifiers::abbreviate;

/// Words that stay lower case in `title` and are dropped by `shorttitle`
const SMALLER_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "down", "for", "from", "in", "into", "nor", "of",
    "on", "onto", "or", "over", "so", "the", "till", "to", "up", "via", "with", "yet", "between",
    "without", "upon", "per", "off", "after", "along", "around", "among",
];

// ===== Handler Tables =====

type NameHandler = fn(&AuthorList) -> String;
type NumberedNameHandler = fn(&AuthorList, &[usize]) -> String;
type FieldHandler = fn(&FieldValueResolver) -> String;
type NumberedFieldHandler = fn(&FieldValueResolver, &[usize]) -> String;

/// A marker family whose name carries numbers, e.g. `auth(\d+)_(\d+)`
struct Numbered<H> {
    pattern: Regex,
    handler: H,
}

impl<H: Copy> Numbered<H> {
    fn new(pattern: &str, handler: H) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            handler,
        }
    }

    fn find(list: &[Self], marker: &str) -> Option<(H, Option<Vec<usize>>)> {
        list.iter().find_map(|entry| {
            entry
                .pattern
                .captures(marker)
                .map(|caps| (entry.handler, numbers(marker, &caps)))
        })
    }
}

type NameMarker = Numbered<NumberedNameHandler>;
type FieldMarker = Numbered<NumberedFieldHandler>;

/// Numeric captures of a marker name; `None` if one does not fit a `usize`.
/// Empty optional groups read as `usize::MAX`.
fn numbers(marker: &str, caps: &Captures) -> Option<Vec<usize>> {
    let mut values = Vec::with_capacity(caps.len());
    for group in caps.iter().skip(1) {
        let value = match group.map(|m| m.as_str()) {
            None | Some("") => usize::MAX,
            Some(digits) => match digits.parse() {
                Ok(n) => n,
                Err(_) => {
                    tracing::warn!("Invalid number '{}' in marker '{}'", digits, marker);
                    return None;
                }
            },
        };
        values.push(value);
    }
    Some(values)
}

lazy_static! {
    static ref AUTHOR_MARKERS: HashMap<&'static str, NameHandler> = {
        let mut m: HashMap<&'static str, NameHandler> = HashMap::new();
        m.insert("auth", format::first_author);
        m.insert("authForeIni", format::first_author_forename_initial);
        m.insert("authFirstFull", format::first_author_von_and_last);
        m.insert("authors", format::all_authors);
        m.insert("authorsAlpha", format::authors_alpha);
        m.insert("authorLast", format::last_author);
        m.insert("authorLastForeIni", format::last_author_forename_initial);
        m.insert("authorIni", format::one_author_plus_initials);
        m.insert("auth.auth.ea", format::auth_auth_ea);
        m.insert("auth.etal", |list| format::auth_etal(list, ".", ".etal"));
        m.insert("authEtAl", |list| format::auth_etal(list, "", "EtAl"));
        m.insert("authshort", format::authshort);
        m
    };

    static ref NUMBERED_AUTHOR_MARKERS: Vec<NameMarker> = vec![
        NameMarker::new(r"^authIni(\d+)$", |list, n| format::auth_ini_n(list, n[0])),
        NameMarker::new(r"^auth(\d+)_(\d+)$", |list, n| format::auth_n_of_m(list, n[0], n[1])),
        NameMarker::new(r"^auth(\d+)$", |list, n| format::auth_n(list, n[0])),
        NameMarker::new(r"^authors(\d+)$", |list, n| format::n_authors(list, n[0])),
    ];

    static ref EDITOR_MARKERS: HashMap<&'static str, NameHandler> = {
        let mut m: HashMap<&'static str, NameHandler> = HashMap::new();
        m.insert("edtr", format::first_author);
        m.insert("edtrForeIni", format::first_author_forename_initial);
        m.insert("editors", format::all_authors);
        m.insert("editorLast", format::last_author);
        m.insert("editorLastForeIni", format::last_author_forename_initial);
        m.insert("editorIni", format::one_author_plus_initials);
        m.insert("edtr.edtr.ea", format::auth_auth_ea);
        m.insert("edtrshort", format::authshort);
        m
    };

    static ref NUMBERED_EDITOR_MARKERS: Vec<NameMarker> = vec![
        NameMarker::new(r"^edtrIni(\d+)$", |list, n| format::auth_ini_n(list, n[0])),
        NameMarker::new(r"^edtr(\d+)_(\d+)$", |list, n| format::auth_n_of_m(list, n[0], n[1])),
        NameMarker::new(r"^edtr(\d+)$", |list, n| {
            truncate_chars(&format::first_author(list), n[0])
        }),
    ];

    static ref FIELD_MARKERS: HashMap<&'static str, FieldHandler> = {
        let mut m: HashMap<&'static str, FieldHandler> = HashMap::new();
        m.insert("firstpage", |r| first_page(&r.field("pages")));
        m.insert("lastpage", |r| last_page(&r.field("pages")));
        m.insert("pageprefix", |r| page_prefix(&r.field("pages")));
        m.insert("title", |r| camelize_significant_words(&r.field("title")));
        m.insert("fulltitle", |r| r.field("title"));
        m.insert("shorttitle", |r| title_words(3, &remove_small_words(&r.field("title"))));
        m.insert("shorttitleINI", |r| {
            keep_letters_and_digits(&abbreviate(&title_words(3, &r.field("title"))))
        });
        m.insert("veryshorttitle", |r| {
            upper_first(&title_words(1, &remove_small_words(&r.field("title"))))
        });
        m.insert("camel", |r| camelize_title(&r.field("title")));
        m.insert("shortyear", |r| short_year(&r.field("year")));
        m.insert("entrytype", |r| r.entry.entry_type.display_name());
        m
    };

    static ref NUMBERED_FIELD_MARKERS: Vec<FieldMarker> = vec![
        FieldMarker::new(r"^camel(\d+)$", |r, n| {
            camelize_title(&title_words(n[0], &r.field("title")))
        }),
        FieldMarker::new(r"^keyword(\d+)$", |r, n| {
            n[0].checked_sub(1)
                .and_then(|i| r.keywords().into_iter().nth(i))
                .unwrap_or_default()
        }),
        FieldMarker::new(r"^keywords(\d*)$", |r, n| {
            r.keywords()
                .iter()
                .take(n[0])
                .map(|k| k.split_whitespace().collect::<String>())
                .collect()
        }),
    ];
}

// ===== Resolver =====

/// Resolves marker names against one record
pub struct FieldValueResolver<'a> {
    entry: &'a BibEntry,
    database: Option<&'a BibDatabase>,
    keyword_delimiter: char,
}

impl<'a> FieldValueResolver<'a> {
    pub fn new(
        entry: &'a BibEntry,
        database: Option<&'a BibDatabase>,
        keyword_delimiter: char,
    ) -> Self {
        Self {
            entry,
            database,
            keyword_delimiter,
        }
    }

    /// Field value with aliases, crossref and macros applied, or `""`
    pub fn field(&self, name: &str) -> String {
        let value = match self.database {
            Some(database) => database.resolved_field(self.entry, name),
            None => self.entry.get_field_or_alias(name),
        };
        value.unwrap_or_default()
    }

    /// Keywords split on the delimiter, trimmed, empty ones dropped
    pub fn keywords(&self) -> Vec<String> {
        self.field("keywords")
            .split(self.keyword_delimiter)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect()
    }

    /// Value of a marker name
    pub fn resolve(&self, marker: &str) -> String {
        if marker.starts_with("auth") || marker.starts_with("pureauth") {
            let (name, pure) = match marker.strip_prefix("pure") {
                Some(rest) => (rest, true),
                None => (marker, false),
            };
            return self
                .resolve_names(name, &AUTHOR_MARKERS, &NUMBERED_AUTHOR_MARKERS, || {
                    let authors = self.field("author");
                    if authors.is_empty() && !pure {
                        self.field("editor")
                    } else {
                        authors
                    }
                })
                .unwrap_or_else(|| self.field(name));
        }

        if marker.starts_with("ed") {
            return self
                .resolve_names(marker, &EDITOR_MARKERS, &NUMBERED_EDITOR_MARKERS, || {
                    self.field("editor")
                })
                .unwrap_or_else(|| self.field(marker));
        }

        if let Some(handler) = FIELD_MARKERS.get(marker) {
            return handler(self);
        }
        if let Some((handler, numbers)) = FieldMarker::find(&NUMBERED_FIELD_MARKERS, marker) {
            return numbers.map(|n| handler(self, &n)).unwrap_or_default();
        }

        self.field(marker)
    }

    /// Run a name marker. `None` means the marker is not a name marker and
    /// should be read as a plain field.
    fn resolve_names(
        &self,
        marker: &str,
        fixed: &HashMap<&'static str, NameHandler>,
        numbered: &[NameMarker],
        source: impl FnOnce() -> String,
    ) -> Option<String> {
        if let Some(handler) = fixed.get(marker) {
            return Some(handler(&AuthorList::for_keys(&source())));
        }
        let (handler, numbers) = NameMarker::find(numbered, marker)?;
        let value = match numbers {
            Some(n) => handler(&AuthorList::for_keys(&source()), &n),
            None => String::new(),
        };
        Some(value)
    }
}

// ===== Pages =====

/// Digit runs as canonical decimal strings, so arbitrarily long numbers compare correctly
fn page_numbers(pages: &str) -> Vec<String> {
    pages
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .map(|run| {
            let trimmed = run.trim_start_matches('0');
            if trimmed.is_empty() {
                "0".to_string()
            } else {
                trimmed.to_string()
            }
        })
        .collect()
}

fn numeric_order(a: &String, b: &String) -> std::cmp::Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Lowest page number: `7--27` gives `7`, `41,7,73--97` gives `7`
pub fn first_page(pages: &str) -> String {
    page_numbers(pages)
        .into_iter()
        .min_by(numeric_order)
        .unwrap_or_default()
}

/// Highest page number
pub fn last_page(pages: &str) -> String {
    page_numbers(pages)
        .into_iter()
        .max_by(numeric_order)
        .unwrap_or_default()
}

/// Non-digit prefix of the pages, like `L` of `L7--12`
pub fn page_prefix(pages: &str) -> String {
    if pages.starts_with(|c: char| !c.is_ascii_digit()) {
        pages.chars().take_while(|c| !c.is_ascii_digit()).collect()
    } else {
        String::new()
    }
}

// ===== Titles =====

fn is_small_word(word: &str) -> bool {
    SMALLER_WORDS.contains(&word.to_lowercase().as_str())
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Decode LaTeX and split into words at whitespace and hyphens
fn format_title(title: &str) -> String {
    decode_latex(title)
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `n` words of a title
pub fn title_words(n: usize, title: &str) -> String {
    format_title(title)
        .split(' ')
        .filter(|w| !w.is_empty())
        .take(n)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn remove_small_words(title: &str) -> String {
    format_title(title)
        .split(' ')
        .filter(|w| !w.is_empty() && !is_small_word(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize the first word and every word that is not a small word
pub fn camelize_significant_words(title: &str) -> String {
    format_title(title)
        .split(' ')
        .filter(|w| !w.is_empty())
        .enumerate()
        .map(|(i, word)| {
            if i == 0 || !is_small_word(word) {
                upper_first(word)
            } else {
                lower_first(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize every word and keep only letters and digits
pub fn camelize_title(title: &str) -> String {
    let camelized: String = format_title(title).split(' ').map(upper_first).collect();
    keep_letters_and_digits(&camelized)
}

fn keep_letters_and_digits(text: &str) -> String {
    text.chars().filter(|c| c.is_alphanumeric()).collect()
}

// ===== Years =====

/// Two-digit year; `IP` for "in press" and "submitted"
pub fn short_year(year: &str) -> String {
    if year.is_empty() {
        return String::new();
    }
    if year.starts_with("in") || year.starts_with("sub") {
        return "IP".to_string();
    }
    let count = year.chars().count();
    if count > 2 {
        year.chars().skip(count - 2).collect()
    } else {
        year.to_string()
    }
}
