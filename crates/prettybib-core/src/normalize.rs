//! String keys shared by the checker, the citation database and the
//! near-duplicate index.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static NUMERIC_ORDINAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b\d+(st|nd|rd|th)\b").unwrap());

static WORD_ORDINAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|eleventh|twelfth|thirteenth|fourteenth|fifteenth|sixteenth|seventeenth|eighteenth|nineteenth|twentieth)\b",
    )
    .unwrap()
});

static DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

static PAPER_KIND_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(Long|Short|Research|Shared Task) Papers\b").unwrap());

/// Lower-cases a title and drops whitespace and `{}` braces.
///
/// Used as the join key between the working database and the citation
/// database, and for exact duplicate detection.
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '{' && *c != '}')
        .collect()
}

/// Venue signature for near-duplicate clustering.
///
/// Edition numbers and paper-track names vary between years of the same
/// venue, so they are replaced with placeholder tokens before comparison.
pub fn normalize_booktitle(title: &str) -> String {
    let unbraced: String = title.chars().filter(|c| *c != '{' && *c != '}').collect();
    let collapsed = collapse_whitespace(unbraced.trim());
    let ordinals = NUMERIC_ORDINAL_REGEX.replace_all(&collapsed, "<ORD>");
    let ordinals = WORD_ORDINAL_REGEX.replace_all(&ordinals, "<ORD>");
    let numbers = DIGITS_REGEX.replace_all(&ordinals, "<NUM>");
    PAPER_KIND_REGEX
        .replace_all(&numbers, "<KIND> Papers")
        .into_owned()
}

/// Rewrites `First Middle Last` authors into `Last, First Middle`.
///
/// Names that already contain a comma and single-word names are kept.
pub fn normalize_authors(field: &str) -> String {
    field
        .split(" and ")
        .map(|author| {
            if author.contains(',') {
                return author.to_string();
            }
            let parts: Vec<&str> = author.split_whitespace().collect();
            match parts.split_last() {
                Some((last, rest)) if !rest.is_empty() => {
                    format!("{}, {}", last, rest.join(" "))
                }
                _ => author.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Replaces every run of whitespace (newlines included) with one space.
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_REGEX.replace_all(value, " ").into_owned()
}
