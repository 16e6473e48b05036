//! BibTeX reader built on nom.
//!
//! Handles `@string` macros, `@preamble`, `@comment`, braced and quoted
//! values, `#` concatenation and nested braces. A record that cannot be
//! parsed is skipped and counted; reading resumes at the next `@`.

use std::collections::HashMap;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::map,
};

use crate::error::{CoreError, Result};
use crate::models::Entry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub line: u32,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub entries: Vec<Entry>,
    pub strings: HashMap<String, String>,
    pub preambles: Vec<String>,
    pub skipped: Vec<SkippedRecord>,
}

enum AtRecord {
    Entry(Entry),
    String(String, String),
    Preamble(String),
    Comment,
}

/// Parses a whole BibTeX database, skipping records that do not parse.
pub fn parse_bibtex(input: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let mut remaining = input;
    let mut line = 1u32;

    loop {
        let Some(pos) = remaining.find('@') else {
            break;
        };
        line += remaining[..pos].matches('\n').count() as u32;
        remaining = &remaining[pos..];

        match parse_at_record(remaining, &outcome.strings) {
            Ok((rest, record)) => {
                match record {
                    AtRecord::Entry(entry) => outcome.entries.push(entry),
                    AtRecord::String(key, value) => {
                        outcome.strings.insert(key, value);
                    }
                    AtRecord::Preamble(text) => outcome.preambles.push(text),
                    AtRecord::Comment => {}
                }
                let consumed = &remaining[..remaining.len() - rest.len()];
                line += consumed.matches('\n').count() as u32;
                remaining = rest;
            }
            Err(_) => {
                outcome.skipped.push(SkippedRecord {
                    line,
                    message: "failed to parse record".to_string(),
                });
                remaining = &remaining[1..];
            }
        }
    }

    outcome
}

/// Parses input that must not contain broken records.
pub fn parse_bibtex_strict(input: &str) -> Result<Vec<Entry>> {
    let outcome = parse_bibtex(input);
    match outcome.skipped.first() {
        Some(first) => Err(CoreError::Syntax {
            line: first.line,
            message: first.message.clone(),
        }),
        None => Ok(outcome.entries),
    }
}

fn parse_at_record<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, AtRecord> {
    let (rest, _) = char('@')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, record_type) = take_while1(|c: char| c.is_ascii_alphanumeric())(rest)?;

    match record_type.to_ascii_lowercase().as_str() {
        "string" => {
            let (rest, (key, value)) = parse_string_definition(rest, strings)?;
            Ok((rest, AtRecord::String(key, value)))
        }
        "preamble" => {
            let (rest, text) = parse_preamble(rest, strings)?;
            Ok((rest, AtRecord::Preamble(text)))
        }
        "comment" => {
            let (rest, _) = parse_comment_body(rest)?;
            Ok((rest, AtRecord::Comment))
        }
        _ => {
            let (rest, entry) = parse_entry_body(rest, record_type, strings)?;
            Ok((rest, AtRecord::Entry(entry)))
        }
    }
}

fn parse_string_definition<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, _) = char('{')(rest)?;
    let (rest, (key, value)) = parse_single_field(rest, strings)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('}')(rest)?;
    Ok((rest, (key, value)))
}

fn parse_preamble<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, String> {
    let (rest, _) = multispace0(input)?;
    let (rest, _) = char('{')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_field_value(rest, strings)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('}')(rest)?;
    Ok((rest, value))
}

fn parse_comment_body(input: &str) -> IResult<&str, ()> {
    let (rest, _) = multispace0(input)?;
    if rest.starts_with('{') {
        let (rest, _) = parse_braced_content(rest)?;
        Ok((rest, ()))
    } else {
        let pos = rest.find('\n').unwrap_or(rest.len());
        Ok((&rest[pos..], ()))
    }
}

fn parse_entry_body<'a>(
    input: &'a str,
    entry_type: &str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, Entry> {
    let (rest, _) = multispace0(input)?;
    let (rest, _) = char('{')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, id) =
        take_while1(|c: char| c.is_alphanumeric() || "_-:./+'".contains(c))(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(',')(rest)?;

    let (rest, fields) = parse_fields(rest, strings)?;

    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('}')(rest)?;

    let mut entry = Entry::new(id, entry_type);
    for (key, value) in fields {
        entry.set(&key, value);
    }
    Ok((rest, entry))
}

fn parse_fields<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, Vec<(String, String)>> {
    let mut fields = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;
        if rest.starts_with('}') {
            return Ok((rest, fields));
        }

        let (rest, field) = parse_single_field(rest, strings)?;
        fields.push(field);

        let (rest, _) = multispace0(rest)?;
        remaining = rest.strip_prefix(',').unwrap_or(rest);
    }
}

fn parse_single_field<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, key) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_field_value(rest, strings)?;
    Ok((rest, (key.to_ascii_lowercase(), value)))
}

fn parse_field_value<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, String> {
    let mut result = String::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;
        let (rest, part) = alt((
            parse_braced_value,
            parse_quoted_value,
            map(take_while1(|c: char| c.is_ascii_digit()), |s: &str| {
                s.to_string()
            }),
            map(
                take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
                |name: &str| {
                    strings
                        .get(&name.to_ascii_lowercase())
                        .cloned()
                        .unwrap_or_else(|| name.to_string())
                },
            ),
        ))(rest)?;

        result.push_str(&part);

        let (rest, _) = multispace0(rest)?;
        match rest.strip_prefix('#') {
            Some(stripped) => remaining = stripped,
            None => return Ok((rest, result)),
        }
    }
}

fn parse_braced_value(input: &str) -> IResult<&str, String> {
    let (rest, content) = parse_braced_content(input)?;
    Ok((rest, content[1..content.len() - 1].to_string()))
}

/// Matches `{...}` with nested braces, returning the slice including the
/// outer braces.
fn parse_braced_content(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }

    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut pos = 0usize;
    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], &input[..pos + 1]));
                }
            }
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

fn parse_quoted_value(input: &str) -> IResult<&str, String> {
    let Some(body) = input.strip_prefix('"') else {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    };

    let mut depth = 0usize;
    let mut escaped = false;
    for (idx, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '"' if depth == 0 => {
                return Ok((&body[idx + 1..], body[..idx].to_string()));
            }
            _ => {}
        }
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_entry() {
        let input = r#"
@Article{Smith2024,
    Author = {John Smith},
    title = {A {G}reat Paper},
    year = 2024,
    journal = "Nature",
}
"#;
        let outcome = parse_bibtex(input);
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.entries.len(), 1);

        let entry = &outcome.entries[0];
        assert_eq!(entry.id, "Smith2024");
        assert_eq!(entry.entry_type, "article");
        assert_eq!(entry.get("author"), Some("John Smith"));
        assert_eq!(entry.get("title"), Some("A {G}reat Paper"));
        assert_eq!(entry.get("year"), Some("2024"));
        assert_eq!(entry.get("journal"), Some("Nature"));
    }

    #[test]
    fn expands_string_macros_and_concatenation() {
        let input = r#"
@string{acl = "Association for Computational Linguistics"}
@preamble{"\newcommand{\noop}[1]{}"}
@comment{ignored @article{x, title={nope}} }
@inproceedings{Doe2020,
    publisher = acl # " (ACL)",
    month = jun,
}
"#;
        let outcome = parse_bibtex(input);
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.preambles.len(), 1);
        let entry = &outcome.entries[0];
        assert_eq!(
            entry.get("publisher"),
            Some("Association for Computational Linguistics (ACL)")
        );
        assert_eq!(entry.get("month"), Some("jun"));
    }

    #[test]
    fn broken_record_is_skipped_and_counted() {
        let input = r#"
@article{Broken,
    title = {Unclosed
@book{Fine2001,
    title = {Still Here},
}
"#;
        let outcome = parse_bibtex(input);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].line, 2);
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].id, "Fine2001");
    }

    #[test]
    fn strict_parse_reports_first_broken_record() {
        let err = parse_bibtex_strict("@article{x, title = {oops}").unwrap_err();
        assert!(matches!(err, CoreError::Syntax { line: 1, .. }));
    }
}
