//! Name list tokenizer and splitter
//!
//! Splits a raw author/editor field into names and each name into its
//! first, von, last and jr parts, following the BibTeX conventions:
//! `First von Last`, `von Last, First` and `von Last, Jr, First`.

use lazy_static::lazy_static;
use std::collections::HashSet;
use std::ops::Range;

use super::Author;

lazy_static! {
    /// Name affixes that never form a name on their own in comma-only lists
    static ref AVOID_TERMS: HashSet<&'static str> =
        ["jr", "sr", "jnr", "snr", "von", "zu", "van", "der"].into_iter().collect();

    /// TeX control words for letters; their case is the case of the name
    static ref TEX_LETTER_NAMES: HashSet<&'static str> =
        ["aa", "ae", "l", "o", "oe", "i", "AA", "AE", "L", "O", "OE", "j"].into_iter().collect();
}

// ===== Lexer =====

#[derive(Debug, Clone)]
struct Word {
    text: String,
    /// Leading part of the word used for initials
    abbr: String,
    /// Separator that followed the word, either ' ' or '-'
    term: char,
    upper: bool,
}

#[derive(Debug)]
enum Lexeme {
    Eof,
    And,
    Comma,
    Word(Word),
}

struct Lexer {
    chars: Vec<char>,
    token_start: usize,
    token_end: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            token_start: 0,
            token_end: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.token_start >= self.chars.len()
    }

    fn next_lexeme(&mut self) -> Lexeme {
        let len = self.chars.len();
        let mut start = self.token_end;
        while start < len {
            let c = self.chars[start];
            if !(c == '~' || c == '-' || c.is_whitespace()) {
                break;
            }
            start += 1;
        }
        self.token_start = start;
        self.token_end = start;

        if start >= len {
            return Lexeme::Eof;
        }
        match self.chars[start] {
            ',' => {
                self.token_end += 1;
                return Lexeme::Comma;
            }
            ';' => {
                self.token_end += 1;
                return Lexeme::And;
            }
            _ => {}
        }

        let mut end = start;
        let mut abbr_end: Option<usize> = None;
        let mut upper = true;
        let mut braces = 0usize;
        let mut backslash: Option<usize> = None;
        let mut first_letter_found = false;

        while end < len {
            let c = self.chars[end];
            if c == '{' {
                braces += 1;
            }
            if first_letter_found && abbr_end.is_none() && (braces == 0 || c == '{') {
                abbr_end = Some(end);
            }
            if c == '}' && braces > 0 {
                braces -= 1;
            }
            if !first_letter_found && backslash.is_none() && c.is_alphabetic() {
                // A braced particle counts as upper case, so
                // "{van den Bergen}, Hans" keeps its last name
                upper = if braces == 0 {
                    c.is_uppercase() || is_han(c)
                } else {
                    true
                };
                first_letter_found = true;
            }
            if let Some(command_start) = backslash {
                if !c.is_alphabetic() {
                    if !first_letter_found {
                        let command: String = self.chars[command_start + 1..end].iter().collect();
                        if TEX_LETTER_NAMES.contains(command.as_str()) {
                            upper = command.starts_with(|ch: char| ch.is_uppercase());
                            first_letter_found = true;
                        }
                    }
                    backslash = None;
                }
            }
            if c == '\\' {
                backslash = Some(end);
            }
            if braces == 0 && (",;~-".contains(c) || c.is_whitespace()) {
                break;
            }
            end += 1;
        }

        self.token_end = end;
        let abbr_end = abbr_end.unwrap_or(end);
        let term = if end < len && self.chars[end] == '-' { '-' } else { ' ' };
        let text: String = self.chars[start..end].iter().collect();

        if text.eq_ignore_ascii_case("and") {
            Lexeme::And
        } else {
            Lexeme::Word(Word {
                text,
                abbr: self.chars[start..abbr_end].iter().collect(),
                term,
                upper,
            })
        }
    }
}

/// Han ideographs have no case; they count as upper case
pub(crate) fn is_han(c: char) -> bool {
    matches!(c as u32,
        0x2E80..=0x2FDF
        | 0x3005
        | 0x3007
        | 0x3021..=0x3029
        | 0x3038..=0x303B
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xF900..=0xFAFF
        | 0x20000..=0x323AF)
}

// ===== Comma-only Lists =====

/// Rewrite `Ali Babar, M., Dingsoyr, T.` style lists into a form the
/// name parser understands. Returns `None` when the input is left as is.
fn rewrite_comma_separated(names: &str) -> Option<String> {
    let has_and = names.to_uppercase().contains(" AND ");
    let comma_count = names.matches(',').count();
    if has_and || names.contains('{') || names.contains(';') || comma_count < 2 {
        return None;
    }

    let mut raw_parts: Vec<&str> = names.split(',').collect();
    while raw_parts.last().is_some_and(|p| p.is_empty()) {
        raw_parts.pop();
    }
    let parts: Vec<&str> = raw_parts.iter().map(|p| p.trim()).collect();

    if parts.iter().all(|p| p.contains(' ')) {
        return Some(names.replace(',', " and"));
    }

    let avoided: HashSet<usize> = parts
        .iter()
        .enumerate()
        .filter(|(_, p)| AVOID_TERMS.contains(p.to_lowercase().as_str()))
        .map(|(i, _)| i)
        .collect();

    if (parts.len() - avoided.len()) % 2 != 0 {
        return None;
    }

    let mut rebuilt = String::with_capacity(names.len() + parts.len());
    let mut avoided_so_far = 0;
    for (i, part) in parts.iter().enumerate() {
        rebuilt.push_str(part);
        if avoided.contains(&i) {
            rebuilt.push(',');
            avoided_so_far += 1;
        } else if (i + avoided_so_far) % 2 == 0 {
            // Between last name and first name
            rebuilt.push(',');
        } else {
            // Between two names
            rebuilt.push(';');
        }
    }
    Some(rebuilt)
}

// ===== Name Splitting =====

/// Parse a raw name list into structured names, without any LaTeX decoding
pub(crate) fn parse_names(input: &str) -> Vec<Author> {
    let rewritten = rewrite_comma_separated(input);
    let mut lexer = Lexer::new(rewritten.as_deref().unwrap_or(input));

    let mut authors = Vec::new();
    while !lexer.at_end() {
        if let Some(author) = next_author(&mut lexer) {
            authors.push(author);
        }
    }
    authors
}

fn next_author(lexer: &mut Lexer) -> Option<Author> {
    let mut words: Vec<Word> = Vec::new();
    let mut von_start: Option<usize> = None;
    let mut last_start: Option<usize> = None;
    let mut comma_first: Option<usize> = None;
    let mut comma_second: Option<usize> = None;

    loop {
        match lexer.next_lexeme() {
            Lexeme::Eof | Lexeme::And => break,
            Lexeme::Comma => {
                if comma_first.is_none() {
                    comma_first = Some(words.len());
                } else if comma_second.is_none() {
                    comma_second = Some(words.len());
                }
            }
            Lexeme::Word(word) => {
                let (upper, term) = (word.upper, word.term);
                words.push(word);
                let index = words.len() - 1;

                if comma_first.is_some() || last_start.is_some() {
                    continue;
                }
                match von_start {
                    None if !upper => {
                        // Lower-case parts of a hyphenated name are not a von part
                        let previous_hyphen = index >= 1 && words[index - 1].term == '-';
                        if !previous_hyphen && term != '-' {
                            von_start = Some(index);
                        }
                    }
                    Some(_) if upper => last_start = Some(index),
                    _ => {}
                }
            }
        }
    }

    if words.is_empty() {
        return None;
    }

    let count = words.len();
    let mut first: Option<Range<usize>> = None;
    let mut von: Option<Range<usize>> = None;
    let mut last: Option<Range<usize>> = None;
    let mut jr: Option<Range<usize>> = None;

    match comma_first {
        None => match von_start {
            None => {
                let mut last_begin = count - 1;
                if count >= 2 && words[count - 2].term == '-' {
                    last_begin -= 1;
                }
                last = Some(last_begin..count);
                if last_begin > 0 {
                    first = Some(0..last_begin);
                }
            }
            Some(von_begin) => {
                match last_start {
                    Some(last_begin) => {
                        last = Some(last_begin..count);
                        von = Some(von_begin..last_begin);
                    }
                    None => von = Some(von_begin..count),
                }
                if von_begin > 0 {
                    first = Some(0..von_begin);
                }
            }
        },
        Some(comma) => {
            match comma_second {
                None => {
                    if comma < count {
                        first = Some(comma..count);
                    }
                }
                Some(second) => {
                    if second < count {
                        first = Some(second..count);
                    }
                    if comma < second {
                        jr = Some(comma..second);
                    }
                }
            }
            if von_start == Some(0) {
                match last_start {
                    Some(last_begin) => {
                        last = Some(last_begin..comma);
                        von = Some(0..last_begin);
                    }
                    None => von = Some(0..comma),
                }
            } else if comma > 0 {
                last = Some(0..comma);
            }
        }
    }

    // A lone lower-case word such as "unknown" is a last name
    if first.is_none() && last.is_none() && von.is_some() {
        last = von.take();
    }

    let join = |range: &Option<Range<usize>>| range.clone().map(|r| concat(&words[r], false));
    let first_part = join(&first);
    let first_abbr = first.clone().map(|r| concat(&words[r], true));
    let von_part = join(&von);
    let last_part = join(&last);
    let jr_part = join(&jr);

    // "Smith SH": a short all-caps last part holds the initials
    if let (Some(first_name), Some(last_name)) = (&first_part, &last_part) {
        let short_caps = *last_name == last_name.to_uppercase()
            && last_name.chars().count() < 5
            && !last_name.starts_with(is_han);
        if short_caps {
            return Some(Author {
                first: Some(last_name.clone()),
                first_abbr: Some(last_name.clone()),
                von: von_part,
                last: Some(first_name.clone()),
                jr: jr_part,
            });
        }
    }

    Some(Author {
        first: first_part,
        first_abbr,
        von: von_part,
        last: last_part,
        jr: jr_part,
    })
}

/// Join words with the separators they were written with
fn concat(words: &[Word], abbreviate: bool) -> String {
    let mut result = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            result.push(words[i - 1].term);
        }
        if abbreviate {
            result.push_str(&word.abbr);
            result.push('.');
        } else {
            result.push_str(&word.text);
        }
    }
    result
}
