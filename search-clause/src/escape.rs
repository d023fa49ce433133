//! Escaping of field names and terms for the Lucene classic query syntax.

use crate::errors::QueryError;

/// Characters with a syntactic meaning in the classic query parser.
pub const LUCENE_SPECIAL: [char; 18] = [
    '\\', '+', '-', '!', '(', ')', ':', '^', '[', ']', '"', '{', '}', '~', '|', '&', '/', ' ',
];

pub const WILDCARDS: [char; 2] = ['*', '?'];

/// Words the parser reads as operators when they stand alone.
pub const OPERATOR_WORDS: [&str; 3] = ["AND", "OR", "NOT"];

/// Escapes `s`, optionally treating `*` and `?` as literal characters.
pub fn escape(s: &str, escape_wildcards: bool) -> String {
    escape_with(s, escape_wildcards, &[])
}

/// Like [`escape`], with additional characters to escape.
pub fn escape_with(s: &str, escape_wildcards: bool, extras: &[char]) -> String {
    let needs_escape = |c: char| {
        LUCENE_SPECIAL.contains(&c)
            || (escape_wildcards && WILDCARDS.contains(&c))
            || extras.contains(&c)
    };

    let mut out = String::with_capacity(s.len() + 1);
    // `\OR` is read back as the term `OR`
    if OPERATOR_WORDS.contains(&s) {
        out.push('\\');
    }
    for c in s.chars() {
        if needs_escape(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Removes escape characters, resolving `\uXXXX` sequences.
///
/// `offset` is the position of `s` within the full query and is only used to
/// report errors.
pub fn discard_escape_char(s: &str, offset: usize) -> Result<String, QueryError> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().enumerate();

    while let Some((idx, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, 'u')) => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = chars
                        .next()
                        .and_then(|(_, h)| h.to_digit(16))
                        .ok_or_else(|| {
                            QueryError::syntax(offset + idx, "Truncated unicode escape sequence.")
                        })?;
                    code = code * 16 + digit;
                }
                let decoded = char::from_u32(code).ok_or_else(|| {
                    QueryError::syntax(offset + idx, format!("Invalid unicode escape \\u{:04x}", code))
                })?;
                out.push(decoded);
            }
            Some((_, escaped)) => out.push(escaped),
            None => {
                return Err(QueryError::syntax(
                    offset + idx,
                    "Term can not end with escape character.",
                ))
            }
        }
    }
    Ok(out)
}

/// Removes escapes from everything but wildcard characters.
///
/// Returns `None` when the pattern contains an escaped `*` or `?`, since such a
/// pattern mixes literal and live wildcards.
pub(crate) fn unescape_wildcard_pattern(pattern: &str) -> Option<String> {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(w) if WILDCARDS.contains(&w) => return None,
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    Some(out)
}
