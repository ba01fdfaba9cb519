//! Short keys for institutional authors
//!
//! `{Linköping University, Department of Electrical Engineering}` becomes
//! `UniLinkoepingEE`, `{Massachusetts Institute of Technology}` becomes
//! `MIT`. An inline abbreviation such as `{The Attributed Graph Grammar
//! System ({AGG})}` is used as is.
//!
//! The name is split on commas. Each segment is reduced to its significant
//! words and classified; the key is the university (or the first
//! unclassified segment), then the school, then the department.

use lazy_static::lazy_static;
use regex::Regex;

use crate::latex::{decode_latex, replace_special_characters};

lazy_static! {
    static ref INLINE_ABBREVIATION: Regex = Regex::new(r"\(\{([A-Z]+)\}\)").unwrap();
    static ref BRACED_CAPITALS: Regex = Regex::new(r"\{[A-Z]+\}").unwrap();
    static ref UNIVERSITY: Regex = Regex::new(r"(?i)^uni(v|b|$)").unwrap();
    static ref TECHNOLOGY: Regex = Regex::new(r"(?i)^tech").unwrap();
    static ref DEPARTMENT_OR_LAB: Regex = Regex::new(r"(?i)^(d[ei]p|lab)").unwrap();
    static ref DEPARTMENT: Regex = Regex::new(r"(?i)^d[ei]p").unwrap();
}

const IGNORED_WORDS: &[&str] = &["press", "the"];

/// What a comma-separated segment of an institution name denotes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SegmentKind {
    university: bool,
    technology: bool,
    school: bool,
    department: bool,
}

impl SegmentKind {
    fn classify(words: &[String]) -> Self {
        let mut kind = Self::default();
        for word in words {
            if UNIVERSITY.is_match(word) {
                kind.university = true;
            } else if TECHNOLOGY.is_match(word) {
                kind.technology = true;
            } else if word.eq_ignore_ascii_case("school") {
                kind.school = true;
            } else if DEPARTMENT_OR_LAB.is_match(word) {
                kind.department = true;
            }
        }
        // An institute of technology is not a university
        if kind.technology {
            kind.university = false;
        }
        kind
    }
}

fn starts_with_uni(word: &str) -> bool {
    let prefix: String = word.chars().take(3).collect();
    prefix.chars().count() == 3 && prefix.eq_ignore_ascii_case("uni")
}

/// Significant words of a segment: capitalized, not an abbreviation with
/// a trailing dot, and not an ignored word. Words starting with `uni` are
/// always kept.
fn significant_words(segment: &str) -> Vec<String> {
    BRACED_CAPITALS
        .replace_all(segment, "")
        .split([' ', '-', '_'])
        .filter(|word| {
            let regular = !word.is_empty()
                && !IGNORED_WORDS.contains(&word.to_lowercase().as_str())
                && !word.ends_with('.')
                && word.starts_with(char::is_uppercase);
            regular || starts_with_uni(word)
        })
        .map(String::from)
        .collect()
}

fn capitals(word: &str) -> String {
    word.chars().filter(|c| c.is_ascii_uppercase()).collect()
}

/// A word that contributes its capitals to a school or department key
fn is_plain_word(word: &str) -> bool {
    !DEPARTMENT.is_match(word)
        && !word.eq_ignore_ascii_case("school")
        && !word.eq_ignore_ascii_case("faculty")
        && !capitals(word).is_empty()
}

/// Generate the key part for an institution name
pub fn institution_key(name: &str) -> String {
    if name.trim().is_empty() {
        return String::new();
    }

    if let Some(caps) = INLINE_ABBREVIATION.captures(name) {
        return caps[1].to_string();
    }

    let decoded = decode_latex(name);
    if decoded.contains('\\') {
        tracing::warn!(
            "Institution name '{}' contains undecoded LaTeX; its key may be incomplete",
            name
        );
    }
    let ascii = replace_special_characters(&decoded);

    let mut segments: Vec<&str> = ascii.split(',').collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }

    let mut university: Option<String> = None;
    let mut department: Option<String> = None;
    let mut school: Option<String> = None;
    let mut rest: Option<String> = None;

    for (index, segment) in segments.iter().enumerate() {
        let words = significant_words(segment);
        let kind = SegmentKind::classify(&words);

        if kind.university {
            let mut key = String::from("Uni");
            for word in words.iter().filter(|w| !starts_with_uni(w)) {
                key.push_str(word);
            }
            university = Some(key);
            // The segment before a university names its department
            if index > 0 && department.is_none() {
                department = Some(segments[index - 1].to_string());
            }
        } else if (kind.school || kind.department) && segments.len() > 1 {
            let abbreviation: String = words
                .iter()
                .filter(|w| is_plain_word(w))
                .map(|w| capitals(w))
                .collect();
            if kind.school {
                school = Some(abbreviation.clone());
            }
            if kind.department {
                department = Some(abbreviation);
            }
        } else if rest.is_none() {
            rest = Some(if words.len() >= 3 {
                words.iter().filter_map(|w| w.chars().next()).collect()
            } else {
                words.concat()
            });
        }
    }

    let mut key = university.or(rest).unwrap_or_default();
    if let Some(school) = &school {
        key.push_str(school);
    }
    if let Some(department) = department {
        if school.as_ref() != Some(&department) {
            key.push_str(&department);
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_university() {
        assert_eq!(institution_key(r#"{Link{\"{o}}ping University}"#), "UniLinkoeping");
    }

    #[test]
    fn test_university_with_department() {
        assert_eq!(
            institution_key(
                r#"{Link{\"{o}}ping University, Department of Electrical Engineering}"#
            ),
            "UniLinkoepingEE"
        );
    }

    #[test]
    fn test_university_with_school() {
        assert_eq!(
            institution_key(r#"{Link{\"{o}}ping University, School of Computer Engineering}"#),
            "UniLinkoepingCE"
        );
    }

    #[test]
    fn test_institute_of_technology() {
        assert_eq!(institution_key("{Massachusetts Institute of Technology}"), "MIT");
    }

    #[test]
    fn test_single_segment_department() {
        assert_eq!(institution_key("{Department of Localhost NullGenerators}"), "DLN");
    }

    #[test]
    fn test_single_segment_school() {
        assert_eq!(institution_key("{The School of Null}"), "SchoolNull");
    }

    #[test]
    fn test_inline_abbreviation() {
        assert_eq!(
            institution_key("{The Attributed Graph Grammar System ({AGG})}"),
            "AGG"
        );
    }

    #[test]
    fn test_long_name_initials() {
        assert_eq!(
            institution_key("{European Union Aviation Safety Agency}"),
            "EUASA"
        );
    }

    #[test]
    fn test_blank() {
        assert_eq!(institution_key("  "), "");
    }
}
