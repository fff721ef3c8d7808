//! Text clean-up applied before phonemization
//!
//! eSpeak reads abbreviations, digit grouping and typographic punctuation
//! poorly, so segments are rewritten into plainer English first.

use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered rewrites; later rules see the output of earlier ones
static TEXT_REWRITES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // Titles only expand in front of a capitalized name
        (r"\bD[Rr]\. ([A-Z])", "Doctor $1"),
        (r"\bM[Rr][Ss]\. ([A-Z])", "Missus $1"),
        (r"\bM[Rr]\. ([A-Z])", "Mister $1"),
        (r"\bM[Ss]\. ([A-Z])", "Miss $1"),
        (r"\betc\.", "etcetera"),
        // 1,000 -> 1000 and 10-20 -> 10 to 20
        (r"(\d),(\d)", "$1$2"),
        (r"(\d)-(\d)", "$1 to $2"),
        (r"\s+", " "),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

/// Dotted capitals such as `U.S.A`, spelled out as `U-S-A`
static ACRONYM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z](?:\.[A-Z])+\b").unwrap());

fn map_punctuation(c: char) -> Option<&'static str> {
    let mapped = match c {
        '\u{2018}' | '\u{2019}' => "'",
        '\u{201c}' | '\u{201d}' => "\"",
        '(' => "\u{00ab}",
        ')' => "\u{00bb}",
        '\u{3001}' | '\u{ff0c}' => ", ",
        '\u{3002}' => ". ",
        '\u{ff01}' => "! ",
        '\u{ff1a}' => ": ",
        '\u{ff1b}' => "; ",
        '\u{ff1f}' => "? ",
        _ => return None,
    };
    Some(mapped)
}

/// Rewrite `text` into a form eSpeak pronounces well
pub fn normalize_text(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for c in text.chars() {
        match map_punctuation(c) {
            Some(replacement) => normalized.push_str(replacement),
            None => normalized.push(c),
        }
    }

    for (pattern, replacement) in TEXT_REWRITES.iter() {
        normalized = pattern.replace_all(&normalized, *replacement).into_owned();
    }

    ACRONYM_RE
        .replace_all(normalized.trim(), |caps: &regex::Captures| caps[0].replace('.', "-"))
        .into_owned()
}
