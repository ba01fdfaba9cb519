//! Cite key legalization
//!
//! Strips characters that cannot appear in a BibTeX key and, optionally,
//! transliterates the rest to ASCII.

use crate::latex::replace_special_characters;

/// Characters removed from keys unless configured otherwise
pub const DEFAULT_UNWANTED_CHARACTERS: &str = "?!;^`ʹ";

/// Characters that are never legal in a key, regardless of configuration
pub const DISALLOWED_CHARACTERS: &[char] = &[
    '{', '}', '(', ')', ',', '=', '\\', '"', '#', '%', '~', '\'',
];

/// Remove unwanted and disallowed characters, transliterate, and strip whitespace.
pub fn clean_key(key: &str, unwanted_characters: &str, transliterate: bool) -> String {
    let stripped: String = key
        .chars()
        .filter(|c| !unwanted_characters.contains(*c) && !DISALLOWED_CHARACTERS.contains(c))
        .collect();

    let stripped = if transliterate {
        replace_special_characters(&stripped)
    } else {
        stripped
    };

    stripped.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Cleanup applied to surnames before they are truncated
pub fn remove_default_unwanted(text: &str) -> String {
    clean_key(text, DEFAULT_UNWANTED_CHARACTERS, true)
}
