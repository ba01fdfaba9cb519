//! Name extraction functions behind the author and editor markers
//!
//! Every function takes a list prepared by [`AuthorList::for_keys`] and
//! returns `""` when there is nothing to extract.

use super::{Author, AuthorList};
use crate::legalize::remove_default_unwanted;

/// Characters taken from the first name by `authorIni`
const CHARS_OF_FIRST: usize = 5;

/// More names than this are abbreviated with `+` by `authorsAlpha`
const MAX_ALPHA_AUTHORS: usize = 4;

fn surname(author: &Author) -> &str {
    author.last.as_deref().unwrap_or("")
}

fn forename_initial(author: &Author) -> String {
    author
        .first_abbr
        .as_deref()
        .and_then(|abbr| abbr.chars().next())
        .map(String::from)
        .unwrap_or_default()
}

/// First `n` characters of `text`
pub(crate) fn truncate_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

fn first_char(text: &str) -> String {
    truncate_chars(text, 1)
}

/// Surnames of the first `max` names joined by `delimiter`; `suffix` is
/// appended when names were left out or the list ends in "et al."
fn join_last_names(list: &AuthorList, max: usize, delimiter: &str, suffix: &str) -> String {
    let names: Vec<&str> = list
        .authors
        .iter()
        .filter_map(|a| a.last.as_deref())
        .take(max)
        .collect();
    let mut result = names.join(delimiter);
    if list.len() > max || list.et_al {
        result.push_str(suffix);
    }
    result
}

// ===== Single Names =====

/// `auth`: surname of the first name
pub fn first_author(list: &AuthorList) -> String {
    list.get(0).map(surname).unwrap_or("").to_string()
}

/// `authForeIni`
pub fn first_author_forename_initial(list: &AuthorList) -> String {
    list.get(0).map(forename_initial).unwrap_or_default()
}

/// `authFirstFull`: von part and surname of the first name, without spaces
pub fn first_author_von_and_last(list: &AuthorList) -> String {
    list.get(0)
        .map(|a| a.last_only().replace(' ', ""))
        .unwrap_or_default()
}

/// `authorLast`
pub fn last_author(list: &AuthorList) -> String {
    list.authors.last().map(surname).unwrap_or("").to_string()
}

/// `authorLastForeIni`
pub fn last_author_forename_initial(list: &AuthorList) -> String {
    list.authors.last().map(forename_initial).unwrap_or_default()
}

// ===== Joined Names =====

/// `authors`: every surname, then `EtAl` for "and others"
pub fn all_authors(list: &AuthorList) -> String {
    join_last_names(list, list.len(), "", "EtAl")
}

/// `authorsN`: the first `n` surnames, then `EtAl` if there are more
pub fn n_authors(list: &AuthorList, n: usize) -> String {
    join_last_names(list, n, "", "EtAl")
}

/// `auth.auth.ea`: `Newton.Maxwell.ea`
pub fn auth_auth_ea(list: &AuthorList) -> String {
    join_last_names(list, 2, ".", ".ea")
}

/// `auth.etal` and `authEtAl`: two surnames, or the first one plus `append`
pub fn auth_etal(list: &AuthorList, delimiter: &str, append: &str) -> String {
    if list.et_al || list.len() > 2 {
        format!("{}{}", first_author(list), append)
    } else {
        join_last_names(list, 2, delimiter, "")
    }
}

// ===== Truncated Names =====

/// `authN_M`: first `n` characters of the `m`th surname, counting from 1
pub fn auth_n_of_m(list: &AuthorList, n: usize, m: usize) -> String {
    if m == 0 {
        return String::new();
    }
    match list.get(m - 1) {
        Some(author) => truncate_chars(&remove_default_unwanted(surname(author)), n),
        None => String::new(),
    }
}

/// `authN`: first `n` characters of the first surname
pub fn auth_n(list: &AuthorList, n: usize) -> String {
    auth_n_of_m(list, n, 1)
}

/// `authorIni`: five characters of the first surname plus the initial of every other one
pub fn one_author_plus_initials(list: &AuthorList) -> String {
    if list.is_empty() {
        return String::new();
    }

    let mut result = auth_n_of_m(list, CHARS_OF_FIRST, 1);
    for m in 2..=list.len() {
        result.push_str(&auth_n_of_m(list, 1, m));
    }
    if list.et_al {
        result.push('+');
    }
    result
}

/// `authshort`: the surname of a single author, otherwise the initials of
/// up to three surnames with `+` when more follow
pub fn authshort(list: &AuthorList) -> String {
    let count = list.len();
    if count == 0 {
        return String::new();
    }
    if count == 1 && !list.et_al {
        return first_author(list);
    }

    let mut result: String = (1..=count.min(3)).map(|m| auth_n_of_m(list, 1, m)).collect();
    if count > 3 || list.et_al {
        result.push('+');
    }
    result
}

/// `authIniN`: `n` characters spread over the surnames.
///
/// Each name gets `n / count` characters and the first `n % count` names
/// one more. With "and others" one character is kept back for a `+`.
/// The result never exceeds `n` characters.
pub fn auth_ini_n(list: &AuthorList, n: usize) -> String {
    if n == 0 || list.is_empty() {
        return String::new();
    }

    let count = list.len();
    let (budget, suffix) = if list.et_al && n > count {
        (n - 1, "+")
    } else {
        (n, "")
    };

    let per_author = budget / count;
    let remainder = budget % count;
    let mut result: String = (0..count)
        .map(|i| {
            let chars = if i < remainder { per_author + 1 } else { per_author };
            auth_n_of_m(list, chars, i + 1)
        })
        .collect();
    result.push_str(suffix);
    truncate_chars(&result, n)
}

/// `authorsAlpha`: BibTeX alpha style label part
pub fn authors_alpha(list: &AuthorList) -> String {
    let count = list.len();
    let name_parts = |author: &Author| -> Vec<String> {
        author
            .last_only()
            .split_whitespace()
            .map(String::from)
            .collect()
    };

    if list.et_al || count > MAX_ALPHA_AUTHORS {
        let mut result: String = list
            .authors
            .iter()
            .take(count.min(MAX_ALPHA_AUTHORS - 1))
            .flat_map(|a| name_parts(a))
            .map(|part| first_char(&part))
            .collect();
        result.push('+');
        return result;
    }

    if count == 1 {
        // Particles by initial, the final part by its first three letters
        let parts = name_parts(&list.authors[0]);
        let Some((final_part, particles)) = parts.split_last() else {
            return String::new();
        };
        let mut result: String = particles.iter().map(|p| first_char(p)).collect();
        result.push_str(&truncate_chars(final_part, 3));
        return result;
    }

    list.authors
        .iter()
        .flat_map(|a| name_parts(a))
        .map(|part| first_char(&part))
        .collect()
}
