//! LaTeX decoding and transliteration
//!
//! Decodes LaTeX accent commands and escapes to Unicode, and replaces
//! special characters with ASCII so they can appear in cite keys.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// Stand-ins for escaped braces while unescaped braces are stripped
const OPEN_BRACE_PLACEHOLDER: char = '\u{E000}';
const CLOSE_BRACE_PLACEHOLDER: char = '\u{E001}';

// ===== Accent Commands =====

lazy_static! {
    /// Accent command to combining mark
    static ref ACCENT_MARKS: HashMap<char, char> = {
        let mut m = HashMap::new();
        m.insert('`', '\u{0300}');
        m.insert('\'', '\u{0301}');
        m.insert('^', '\u{0302}');
        m.insert('~', '\u{0303}');
        m.insert('=', '\u{0304}');
        m.insert('u', '\u{0306}');
        m.insert('.', '\u{0307}');
        m.insert('"', '\u{0308}');
        m.insert('r', '\u{030A}');
        m.insert('H', '\u{030B}');
        m.insert('v', '\u{030C}');
        m.insert('d', '\u{0323}');
        m.insert('c', '\u{0327}');
        m.insert('k', '\u{0328}');
        m.insert('b', '\u{0331}');
        m
    };

    // \"o, \'{e}, \^{\i}
    static ref SYMBOL_ACCENT: Regex =
        Regex::new(r#"\\([`'^"~=.])\s*(?:\{\s*(\\[ij]|[A-Za-z])\s*\}|(\\[ij]|[A-Za-z]))"#).unwrap();

    // \v{c}, \c c, \H{o}
    static ref LETTER_ACCENT: Regex = Regex::new(
        r"\\([uvHckrbd])(?:\s*\{\s*(\\[ij]|[A-Za-z])\s*\}|\s+(\\[ij]|[A-Za-z]))"
    )
    .unwrap();
}

// ===== Special Letters =====

lazy_static! {
    static ref SPECIAL_LETTER: Regex =
        Regex::new(r"\\(aa|AA|ae|AE|oe|OE|ss|o|O|l|L|i|j)\b(?:\{\})?").unwrap();

    static ref SPECIAL_LETTERS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("aa", "å");
        m.insert("AA", "Å");
        m.insert("ae", "æ");
        m.insert("AE", "Æ");
        m.insert("oe", "œ");
        m.insert("OE", "Œ");
        m.insert("ss", "ß");
        m.insert("o", "ø");
        m.insert("O", "Ø");
        m.insert("l", "ł");
        m.insert("L", "Ł");
        m.insert("i", "ı");
        m.insert("j", "ȷ");
        m
    };
}

// ===== Escapes and Symbols =====

lazy_static! {
    /// Sorted longest first so `---` wins over `--`
    static ref SYMBOLS: Vec<(&'static str, &'static str)> = {
        let mut symbols = vec![
            ("\\&", "&"),
            ("\\%", "%"),
            ("\\$", "$"),
            ("\\#", "#"),
            ("\\_", "_"),
            ("\\textendash", "–"),
            ("\\textemdash", "—"),
            ("\\textquoteright", "’"),
            ("\\textquoteleft", "‘"),
            ("\\textasciitilde", "~"),
            ("\\ldots", "…"),
            ("\\dots", "…"),
            ("---", "—"),
            ("--", "–"),
            ("~", " "),
        ];
        symbols.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        symbols
    };

    // Commands whose argument is kept: \emph{x}, \textbf{x}
    static ref COMMAND_WITH_ARGUMENT: Regex = Regex::new(r"\\[a-zA-Z]+\*?\s*\{([^{}]*)\}").unwrap();

    // Any remaining control word
    static ref BARE_COMMAND: Regex = Regex::new(r"\\[a-zA-Z]+\*?\s*").unwrap();
}

fn compose_accent(caps: &Captures) -> String {
    let command = caps[1].chars().next().unwrap_or_default();
    let base = caps
        .get(2)
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
        .unwrap_or_default();
    let base = match base {
        "\\i" => "i",
        "\\j" => "j",
        other => other,
    };
    match ACCENT_MARKS.get(&command) {
        Some(mark) => format!("{}{}", base, mark).nfc().collect(),
        None => base.to_string(),
    }
}

/// Decode LaTeX markup to Unicode.
///
/// Accents become precomposed letters, escapes become their characters,
/// formatting commands are dropped with their arguments kept, and grouping
/// braces are removed.
pub fn decode_latex(input: &str) -> String {
    if !input.contains(['\\', '{', '}', '~', '-']) {
        return input.to_string();
    }

    let mut result = input
        .replace("\\{", &OPEN_BRACE_PLACEHOLDER.to_string())
        .replace("\\}", &CLOSE_BRACE_PLACEHOLDER.to_string());

    result = SYMBOL_ACCENT.replace_all(&result, compose_accent).into_owned();
    result = LETTER_ACCENT.replace_all(&result, compose_accent).into_owned();
    result = SPECIAL_LETTER
        .replace_all(&result, |caps: &Captures| {
            SPECIAL_LETTERS
                .get(&caps[1])
                .map(|s| s.to_string())
                .unwrap_or_default()
        })
        .into_owned();

    for (pattern, replacement) in SYMBOLS.iter() {
        result = result.replace(pattern, replacement);
    }

    // Nested commands unwrap from the inside out
    loop {
        let next = COMMAND_WITH_ARGUMENT.replace_all(&result, "$1").into_owned();
        if next == result {
            break;
        }
        result = next;
    }
    result = BARE_COMMAND.replace_all(&result, "").into_owned();

    result
        .chars()
        .filter(|c| *c != '{' && *c != '}')
        .map(|c| match c {
            OPEN_BRACE_PLACEHOLDER => '{',
            CLOSE_BRACE_PLACEHOLDER => '}',
            other => other,
        })
        .collect()
}

// ===== Transliteration =====

lazy_static! {
    /// Letters whose ASCII form is not their NFD base letter
    static ref SPECIAL_CHARACTER_REPLACEMENTS: HashMap<char, &'static str> = {
        let mut m = HashMap::new();
        m.insert('Ä', "Ae");
        m.insert('ä', "ae");
        m.insert('Ö', "Oe");
        m.insert('ö', "oe");
        m.insert('Ü', "Ue");
        m.insert('ü', "ue");
        m.insert('ß', "ss");
        m.insert('Å', "Aa");
        m.insert('å', "aa");
        m.insert('Æ', "Ae");
        m.insert('æ', "ae");
        m.insert('Œ', "Oe");
        m.insert('œ', "oe");
        m.insert('Ø', "O");
        m.insert('ø', "o");
        m.insert('Ł', "L");
        m.insert('ł', "l");
        m.insert('Đ', "D");
        m.insert('đ', "d");
        m.insert('Ð', "D");
        m.insert('ð', "d");
        m.insert('Þ', "Th");
        m.insert('þ', "th");
        m.insert('Ħ', "H");
        m.insert('ħ', "h");
        m.insert('Ŀ', "L");
        m.insert('ŀ', "l");
        m.insert('ı', "i");
        m.insert('ȷ', "j");
        let letters = CYRILLIC_LETTERS.iter().chain(GREEK_LETTERS);
        for (upper, lower, upper_latin, lower_latin) in letters {
            m.insert(*upper, *upper_latin);
            m.insert(*lower, *lower_latin);
        }
        m.insert('ς', "s");
        m
    };
}

/// Cyrillic letters as (upper, lower, upper Latin, lower Latin), BGN/PCGN style
const CYRILLIC_LETTERS: &[(char, char, &str, &str)] = &[
    ('А', 'а', "A", "a"),
    ('Б', 'б', "B", "b"),
    ('В', 'в', "V", "v"),
    ('Г', 'г', "G", "g"),
    ('Ґ', 'ґ', "G", "g"),
    ('Д', 'д', "D", "d"),
    ('Е', 'е', "E", "e"),
    ('Ё', 'ё', "E", "e"),
    ('Є', 'є', "Ye", "ye"),
    ('Ж', 'ж', "Zh", "zh"),
    ('З', 'з', "Z", "z"),
    ('И', 'и', "I", "i"),
    ('І', 'і', "I", "i"),
    ('Ї', 'ї', "Yi", "yi"),
    ('Й', 'й', "Y", "y"),
    ('К', 'к', "K", "k"),
    ('Л', 'л', "L", "l"),
    ('М', 'м', "M", "m"),
    ('Н', 'н', "N", "n"),
    ('О', 'о', "O", "o"),
    ('П', 'п', "P", "p"),
    ('Р', 'р', "R", "r"),
    ('С', 'с', "S", "s"),
    ('Т', 'т', "T", "t"),
    ('У', 'у', "U", "u"),
    ('Ў', 'ў', "U", "u"),
    ('Ф', 'ф', "F", "f"),
    ('Х', 'х', "Kh", "kh"),
    ('Ц', 'ц', "Ts", "ts"),
    ('Ч', 'ч', "Ch", "ch"),
    ('Ш', 'ш', "Sh", "sh"),
    ('Щ', 'щ', "Shch", "shch"),
    ('Ъ', 'ъ', "", ""),
    ('Ы', 'ы', "Y", "y"),
    ('Ь', 'ь', "", ""),
    ('Э', 'э', "E", "e"),
    ('Ю', 'ю', "Yu", "yu"),
    ('Я', 'я', "Ya", "ya"),
];

/// Greek letters, ELOT 743 without diacritics
const GREEK_LETTERS: &[(char, char, &str, &str)] = &[
    ('Α', 'α', "A", "a"),
    ('Β', 'β', "V", "v"),
    ('Γ', 'γ', "G", "g"),
    ('Δ', 'δ', "D", "d"),
    ('Ε', 'ε', "E", "e"),
    ('Ζ', 'ζ', "Z", "z"),
    ('Η', 'η', "I", "i"),
    ('Θ', 'θ', "Th", "th"),
    ('Ι', 'ι', "I", "i"),
    ('Κ', 'κ', "K", "k"),
    ('Λ', 'λ', "L", "l"),
    ('Μ', 'μ', "M", "m"),
    ('Ν', 'ν', "N", "n"),
    ('Ξ', 'ξ', "X", "x"),
    ('Ο', 'ο', "O", "o"),
    ('Π', 'π', "P", "p"),
    ('Ρ', 'ρ', "R", "r"),
    ('Σ', 'σ', "S", "s"),
    ('Τ', 'τ', "T", "t"),
    ('Υ', 'υ', "Y", "y"),
    ('Φ', 'φ', "F", "f"),
    ('Χ', 'χ', "Ch", "ch"),
    ('Ψ', 'ψ', "Ps", "ps"),
    ('Ω', 'ω', "O", "o"),
];

/// Replace non-ASCII letters with ASCII equivalents.
///
/// German umlauts become `e` digraphs (`ö` to `oe`), other accented
/// letters lose their accents (`é` to `e`), and Cyrillic and Greek letters
/// are romanized (`Карпенко` to `Karpenko`).
pub fn replace_special_characters(input: &str) -> String {
    if input.is_ascii() {
        return input.to_string();
    }

    let mut result = String::with_capacity(input.len());
    for c in input.nfc() {
        if c.is_ascii() {
            result.push(c);
        } else if let Some(replacement) = SPECIAL_CHARACTER_REPLACEMENTS.get(&c) {
            result.push_str(replacement);
        } else {
            // Accented base letters may themselves need a replacement, e.g. Greek `ά`
            for d in std::iter::once(c).nfd().filter(|d| !is_combining_mark(*d)) {
                match SPECIAL_CHARACTER_REPLACEMENTS.get(&d) {
                    Some(replacement) => result.push_str(replacement),
                    None => result.push(d),
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_umlaut_forms() {
        assert_eq!(decode_latex(r#"M\"uller"#), "Müller");
        assert_eq!(decode_latex(r#"M\"{u}ller"#), "Müller");
        assert_eq!(decode_latex(r#"M{\"u}ller"#), "Müller");
        assert_eq!(decode_latex(r#"K{\"o}ning"#), "Köning");
    }

    #[test]
    fn test_nested_braces_in_institution() {
        assert_eq!(
            decode_latex(r#"{Link{\"{o}}ping University}"#),
            "Linköping University"
        );
    }

    #[test]
    fn test_letter_accents() {
        assert_eq!(decode_latex(r"Popovi\v{c}ov\'{a}"), "Popovičová");
        assert_eq!(decode_latex(r"gar\c con"), "garçon");
        assert_eq!(decode_latex(r"Erd\H{o}s"), "Erdős");
    }

    #[test]
    fn test_dotless_i() {
        assert_eq!(decode_latex(r"Garc\'{\i}a"), "García");
        assert_eq!(decode_latex(r"Garc\'\i{}a"), "García");
    }

    #[test]
    fn test_special_letters() {
        assert_eq!(decode_latex(r"Gau{\ss}"), "Gauß");
        assert_eq!(decode_latex(r"{\O}stergaard"), "Østergaard");
        assert_eq!(decode_latex(r"\L{}ukasz"), "Łukasz");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(decode_latex(r"Smith \& Jones"), "Smith & Jones");
        assert_eq!(decode_latex(r"100\% \{sure\}"), "100% {sure}");
        assert_eq!(decode_latex("1--10"), "1–10");
        assert_eq!(decode_latex("Donald~E. Knuth"), "Donald E. Knuth");
    }

    #[test]
    fn test_formatting_commands() {
        assert_eq!(decode_latex(r"\emph{Very} \textbf{bold}"), "Very bold");
        assert_eq!(decode_latex(r"\textit{\textbf{deep}}"), "deep");
        assert_eq!(decode_latex(r"The \LaTeX Companion"), "The Companion");
    }

    #[test]
    fn test_braces_removed() {
        assert_eq!(decode_latex("{BPEL} conformance"), "BPEL conformance");
        assert_eq!(decode_latex("plain text"), "plain text");
    }

    #[test]
    fn test_replace_umlauts() {
        assert_eq!(replace_special_characters("ÄäËëÏïÖöÜüŸÿ"), "AeaeEeIiOeoeUeueYy");
        assert_eq!(replace_special_characters("ÅåŮů"), "AaaaUu");
        assert_eq!(replace_special_characters("Gauß"), "Gauss");
    }

    #[test]
    fn test_replace_accents() {
        assert_eq!(
            replace_special_characters("ÀàÈèÌìÒòÙùÂâĈĉÊê"),
            "AaEeIiOoUuAaCcEe"
        );
        assert_eq!(replace_special_characters("ǍǎČčĎď"), "AaCcDd");
        assert_eq!(replace_special_characters("ḌḍḤḥḸḹ"), "DdHhLl");
        assert_eq!(replace_special_characters("ĊċİıŻż"), "CcIiZz");
    }

    #[test]
    fn test_replace_non_decomposable() {
        assert_eq!(replace_special_characters("Łódź"), "Lodz");
        assert_eq!(replace_special_characters("Søren"), "Soren");
    }

    #[test]
    fn test_replace_cyrillic_and_greek() {
        assert_eq!(replace_special_characters("Надежда Карпенко"), "Nadezhda Karpenko");
        assert_eq!(replace_special_characters("Щукин Юрьевич"), "Shchukin Yurevich");
        assert_eq!(replace_special_characters("Σωκράτης"), "Sokratis");
        assert_eq!(replace_special_characters("Ψάλτης"), "Psaltis");
    }

    #[test]
    fn test_replace_decomposed_input() {
        // o followed by a combining diaeresis
        assert_eq!(replace_special_characters("Ko\u{0308}ning"), "Koening");
    }
}
