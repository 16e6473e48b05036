//! Per-field validators.
//!
//! Every validator reads the field from the entry, may rewrite it and returns
//! whether the value is accepted. Sentinel values are never reported as
//! malformed; only `isbn`, `issn` and `doi` try to recover from them.

use once_cell::sync::Lazy;
use prettybib_core::{Entry, SENTINEL};
use regex::Regex;
use tracing::warn;

use crate::identifiers::{Doi, Isbn, IsbnKind, Issn};
use crate::sources::LookupOutcome;
use crate::validation::address::{AddressCheck, check_address};
use crate::validation::context::CheckContext;
use crate::validation::log::DiagnosticKind;

static PAGES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([1-9][0-9]*)\W+([1-9][0-9]*)$").unwrap());

static INITIAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]\.?$").unwrap());

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Known misspellings and BibTeX macros, with the month they stand for.
const MONTH_VARIANTS: &[(&str, &str)] = &[
    ("Feburay", "February"),
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// ISBN-10 numbers stopped being issued in this year.
const ISBN13_SINCE: i64 = 2007;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValidator {
    Year,
    Pages,
    Isbn,
    Issn,
    Booktitle,
    Month,
    Address,
    Author,
    Doi,
}

impl FieldValidator {
    pub fn for_field(field: &str) -> Option<Self> {
        Some(match field {
            "year" => Self::Year,
            "pages" => Self::Pages,
            "isbn" => Self::Isbn,
            "issn" => Self::Issn,
            "booktitle" => Self::Booktitle,
            "month" => Self::Month,
            "address" => Self::Address,
            "author" => Self::Author,
            "doi" => Self::Doi,
            _ => return None,
        })
    }

    pub fn field(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Pages => "pages",
            Self::Isbn => "isbn",
            Self::Issn => "issn",
            Self::Booktitle => "booktitle",
            Self::Month => "month",
            Self::Address => "address",
            Self::Author => "author",
            Self::Doi => "doi",
        }
    }

    pub async fn validate(
        self,
        ctx: &mut CheckContext<'_>,
        entry: &mut Entry,
        try_fix: bool,
    ) -> bool {
        match self {
            Self::Year => check_year(ctx, entry),
            Self::Pages => check_pages(ctx, entry, try_fix),
            Self::Isbn => check_isbn(ctx, entry, try_fix).await,
            Self::Issn => check_issn(ctx, entry, try_fix).await,
            Self::Booktitle => check_booktitle(ctx, entry),
            Self::Month => check_month(ctx, entry, try_fix),
            Self::Address => check_address_field(ctx, entry, try_fix),
            Self::Author => check_authors(ctx, entry),
            Self::Doi => check_doi(ctx, entry, try_fix).await,
        }
    }
}

/// Owned copy of a field unless it is absent or the sentinel.
fn real_value(entry: &Entry, field: &str) -> Option<String> {
    entry.value(field).map(str::to_string)
}

fn malformed(ctx: &mut CheckContext<'_>, entry: &Entry, field: &str, message: String) {
    ctx.log
        .error(entry, DiagnosticKind::MalformedField, Some(field), message);
}

fn check_year(ctx: &mut CheckContext<'_>, entry: &Entry) -> bool {
    let Some(value) = real_value(entry, "year") else {
        return false;
    };
    let Ok(year) = value.trim().parse::<i64>() else {
        malformed(ctx, entry, "year", format!("year '{value}' is not an integer."));
        return false;
    };

    let mut accepted = true;
    if year < 0 {
        malformed(ctx, entry, "year", format!("year '{year}' is negative."));
        accepted = false;
    }
    if year > i64::from(ctx.current_year) {
        malformed(ctx, entry, "year", format!("year '{year}' is in the future."));
        accepted = false;
    }
    if year < 1800 {
        malformed(ctx, entry, "year", format!("year '{year}' is before 1800."));
        accepted = false;
    }
    accepted
}

fn check_pages(ctx: &mut CheckContext<'_>, entry: &mut Entry, try_fix: bool) -> bool {
    let Some(value) = real_value(entry, "pages") else {
        return false;
    };
    let range = PAGES_REGEX.captures(&value).and_then(|caps| {
        let start = caps[1].parse::<u64>().ok()?;
        let end = caps[2].parse::<u64>().ok()?;
        Some((start, end))
    });
    let Some((start, end)) = range else {
        malformed(ctx, entry, "pages", format!("pages field looks strange: '{value}'."));
        return false;
    };

    if end < start {
        malformed(
            ctx,
            entry,
            "pages",
            format!("the end page ({end}) is before the start page ({start})."),
        );
        return false;
    }

    let canonical = format!("{start}--{end}");
    if try_fix && canonical != value {
        entry.set("pages", canonical.as_str());
        ctx.log
            .info(entry, Some("pages"), format!("pages rewritten as '{canonical}'."));
    }
    true
}

/// Year of the entry if it reads as an integer.
fn entry_year(entry: &Entry) -> Option<i64> {
    entry.value("year").and_then(|y| y.trim().parse().ok())
}

async fn check_isbn(ctx: &mut CheckContext<'_>, entry: &mut Entry, try_fix: bool) -> bool {
    let raw = entry.get("isbn").unwrap_or(SENTINEL).to_string();
    let isbn = match Isbn::parse(&raw) {
        Ok(isbn) => isbn,
        Err(_) => {
            if raw != SENTINEL {
                malformed(ctx, entry, "isbn", format!("invalid ISBN '{raw}'."));
            }
            return false;
        }
    };

    if try_fix {
        fill_from_isbn(ctx, entry, &isbn).await;
    }

    match isbn.kind {
        IsbnKind::Isbn10 => match entry_year(entry) {
            Some(year) if year >= ISBN13_SINCE => {
                malformed(
                    ctx,
                    entry,
                    "isbn",
                    format!(
                        "ISBN-10 ({raw}) was issued only before {ISBN13_SINCE}, year is actually {year}."
                    ),
                );
                return false;
            }
            Some(_) => {}
            None => {
                malformed(
                    ctx,
                    entry,
                    "isbn",
                    format!("ISBN-10 ({raw}) cannot be checked without a readable year."),
                );
                return false;
            }
        },
        IsbnKind::Isbn13 => {
            if !isbn.checksum_valid {
                malformed(
                    ctx,
                    entry,
                    "isbn",
                    format!("ISBN-13 ({raw}) has a wrong check digit."),
                );
            }
            if let Some(year) = entry_year(entry)
                && year < ISBN13_SINCE
                && isbn.compact.starts_with("978")
            {
                malformed(
                    ctx,
                    entry,
                    "isbn",
                    format!(
                        "ISBN-13 ({raw}) was issued only after {ISBN13_SINCE}, year is actually {year}."
                    ),
                );
            }
        }
    }

    entry.set("isbn", isbn.masked());
    true
}

async fn fill_from_isbn(ctx: &mut CheckContext<'_>, entry: &mut Entry, isbn: &Isbn) {
    if !entry.is_missing("publisher") && !entry.is_missing("year") {
        return;
    }
    let meta = match ctx.lookups.isbn.isbn_meta(isbn).await {
        LookupOutcome::Found(meta) => meta,
        LookupOutcome::NotFound => return,
        LookupOutcome::Failed(reason) => {
            warn!("{}: ISBN metadata lookup failed: {}", entry.id, reason);
            return;
        }
    };

    if let Some(year) = meta.year
        && entry.is_missing("year")
    {
        entry.set("year", year.as_str());
        ctx.log
            .info(entry, Some("year"), format!("year found based on ISBN: {year}."));
    }
    if let Some(publisher) = meta.publisher
        && entry.is_missing("publisher")
    {
        entry.set("publisher", publisher.as_str());
        ctx.log.info(
            entry,
            Some("publisher"),
            format!("publisher found based on ISBN: '{publisher}'."),
        );
    }
}

async fn check_issn(ctx: &mut CheckContext<'_>, entry: &mut Entry, try_fix: bool) -> bool {
    let raw = entry.get("issn").unwrap_or(SENTINEL).to_string();
    if Issn::is_valid(&raw) {
        return true;
    }
    if raw != SENTINEL {
        malformed(ctx, entry, "issn", format!("invalid ISSN format '{raw}'."));
    }

    let Some(journal) = entry.value("journal").map(str::to_string) else {
        return false;
    };
    if !try_fix {
        return false;
    }

    if let Some(issn) = ctx.issn_cache.get(&journal).map(str::to_string) {
        entry.set("issn", issn.as_str());
        ctx.log.info(
            entry,
            Some("issn"),
            format!("ISSN for '{journal}' taken from other entries: {issn}."),
        );
        return true;
    }

    match ctx.lookups.issn.lookup_issn(&journal).await {
        LookupOutcome::Found(found) => {
            let Ok(issn) = Issn::parse(found.trim()) else {
                ctx.log.error(
                    entry,
                    DiagnosticKind::LookupFailed,
                    Some("issn"),
                    format!("ISSN '{found}' found for '{journal}' is malformed."),
                );
                return false;
            };
            entry.set("issn", issn.as_str());
            ctx.issn_cache.insert(&journal, issn.as_str());
            ctx.log.info(
                entry,
                Some("issn"),
                format!("ISSN for '{journal}' found: {}.", issn.as_str()),
            );
            true
        }
        outcome => {
            if let LookupOutcome::Failed(reason) = outcome {
                warn!("{}: ISSN lookup for '{}' failed: {}", entry.id, journal, reason);
            }
            ctx.log.error(
                entry,
                DiagnosticKind::LookupFailed,
                Some("issn"),
                format!("ISSN for '{journal}' not found."),
            );
            false
        }
    }
}

fn check_booktitle(ctx: &mut CheckContext<'_>, entry: &Entry) -> bool {
    let Some(value) = real_value(entry, "booktitle") else {
        return false;
    };
    if value.trim_end().ends_with("Conference on") {
        malformed(
            ctx,
            entry,
            "booktitle",
            format!("booktitle '{value}' is cut off after 'Conference on'."),
        );
        return false;
    }
    true
}

fn check_month(ctx: &mut CheckContext<'_>, entry: &mut Entry, try_fix: bool) -> bool {
    let Some(value) = real_value(entry, "month") else {
        return false;
    };
    if MONTHS.contains(&value.as_str()) {
        return true;
    }
    let Some((_, canonical)) = MONTH_VARIANTS.iter().find(|(variant, _)| *variant == value) else {
        malformed(
            ctx,
            entry,
            "month",
            format!("month '{value}' is not an English month name."),
        );
        return false;
    };

    malformed(
        ctx,
        entry,
        "month",
        format!("month '{value}' should be written as '{canonical}'."),
    );
    if !try_fix {
        return false;
    }
    entry.set("month", *canonical);
    ctx.log
        .info(entry, Some("month"), format!("month '{value}' renamed to '{canonical}'."));
    true
}

fn check_address_field(
    ctx: &mut CheckContext<'_>,
    entry: &mut Entry,
    try_fix: bool,
) -> bool {
    let Some(value) = real_value(entry, "address") else {
        return false;
    };
    match check_address(&value) {
        AddressCheck::Valid => true,
        AddressCheck::Rename { canonical, reason } => {
            if try_fix {
                entry.set("address", canonical.as_str());
                ctx.log.info(
                    entry,
                    Some("address"),
                    format!("address rewritten as '{canonical}'."),
                );
            } else {
                ctx.log.info(entry, Some("address"), reason);
            }
            true
        }
        AddressCheck::Invalid(message) => {
            malformed(ctx, entry, "address", message);
            false
        }
    }
}

/// Flags abbreviated names. Never rejects the field.
fn check_authors(ctx: &mut CheckContext<'_>, entry: &Entry) -> bool {
    let Some(value) = real_value(entry, "author") else {
        return false;
    };
    for author in value.split(" and ").map(str::trim) {
        if author == "others" {
            continue;
        }
        let given = match author.split_once(',') {
            Some((_, given)) => given.split_whitespace().next(),
            None => author.split_whitespace().next(),
        };
        if let Some(first) = given
            && INITIAL_REGEX.is_match(first)
        {
            malformed(
                ctx,
                entry,
                "author",
                format!("author '{author}' has only an initial as the first name."),
            );
        }
        if author
            .split(|c: char| c.is_whitespace() || c == ',')
            .any(|token| token.ends_with('.'))
        {
            malformed(
                ctx,
                entry,
                "author",
                format!("author '{author}' has a name part ending with a period."),
            );
        }
    }
    true
}

async fn check_doi(ctx: &mut CheckContext<'_>, entry: &mut Entry, try_fix: bool) -> bool {
    let raw = entry.get("doi").unwrap_or(SENTINEL).to_string();
    if raw != SENTINEL {
        if Doi::parse(&raw).is_ok() {
            return true;
        }
        malformed(ctx, entry, "doi", format!("DOI '{raw}' is malformed."));
    }

    if !try_fix {
        return false;
    }
    let Some(title) = entry.title().map(str::to_string) else {
        return false;
    };

    match ctx.lookups.doi.search_doi_by_title(&title).await {
        LookupOutcome::Found(mut candidates) if candidates.len() == 1 => {
            let doi = candidates.remove(0);
            entry.set("doi", doi.as_str());
            ctx.log
                .info(entry, Some("doi"), format!("DOI found based on title: {doi}."));
            true
        }
        LookupOutcome::Found(candidates) => {
            ctx.log.error(
                entry,
                DiagnosticKind::LookupFailed,
                Some("doi"),
                format!(
                    "DOI search by title is ambiguous: {}.",
                    candidates.join(", ")
                ),
            );
            false
        }
        outcome => {
            if let LookupOutcome::Failed(reason) = outcome {
                warn!("{}: DOI search failed: {}", entry.id, reason);
            }
            ctx.log.error(
                entry,
                DiagnosticKind::LookupFailed,
                Some("doi"),
                "DOI not found based on title.",
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use prettybib_core::CitationDatabase;

    use super::*;
    use crate::sources::{DoiSearch, IsbnMetadata, IsbnMetadataLookup, IssnLookup, Lookups};
    use crate::validation::context::IssnCache;

    struct FixedIssn(LookupOutcome<String>, AtomicUsize);

    #[async_trait]
    impl IssnLookup for FixedIssn {
        async fn lookup_issn(&self, _journal: &str) -> LookupOutcome<String> {
            self.1.fetch_add(1, Ordering::SeqCst);
            self.0.clone()
        }
    }

    struct FixedDois(Vec<&'static str>);

    #[async_trait]
    impl DoiSearch for FixedDois {
        async fn search_doi_by_title(&self, _title: &str) -> LookupOutcome<Vec<String>> {
            if self.0.is_empty() {
                return LookupOutcome::NotFound;
            }
            LookupOutcome::Found(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct FixedMeta;

    #[async_trait]
    impl IsbnMetadataLookup for FixedMeta {
        async fn isbn_meta(&self, _isbn: &Isbn) -> LookupOutcome<IsbnMetadata> {
            LookupOutcome::Found(IsbnMetadata {
                year: Some("1996".to_string()),
                publisher: Some("Oxford University Press".to_string()),
            })
        }
    }

    fn context(citations: &CitationDatabase, lookups: Lookups) -> CheckContext<'_> {
        CheckContext::new(citations, lookups).with_current_year(2024)
    }

    async fn run(validator: FieldValidator, entry: &mut Entry, try_fix: bool) -> (bool, Vec<String>) {
        let citations = CitationDatabase::new();
        let mut ctx = context(&citations, Lookups::offline());
        let accepted = validator.validate(&mut ctx, entry, try_fix).await;
        let messages = ctx.log.diagnostics().iter().map(|d| d.message.clone()).collect();
        (accepted, messages)
    }

    #[test]
    fn registry_covers_known_fields() {
        for field in ["year", "pages", "isbn", "issn", "booktitle", "month", "address", "author", "doi"] {
            assert_eq!(FieldValidator::for_field(field).map(FieldValidator::field), Some(field));
        }
        assert_eq!(FieldValidator::for_field("publisher"), None);
    }

    #[tokio::test]
    async fn year_rules() {
        let mut entry = Entry::new("a", "book").with("year", "1999");
        assert!(run(FieldValidator::Year, &mut entry, false).await.0);

        let mut entry = Entry::new("a", "book").with("year", "2031");
        let (accepted, messages) = run(FieldValidator::Year, &mut entry, false).await;
        assert!(!accepted);
        assert_eq!(messages, vec!["year '2031' is in the future."]);

        let mut entry = Entry::new("a", "book").with("year", "1750");
        assert!(!run(FieldValidator::Year, &mut entry, false).await.0);

        let mut entry = Entry::new("a", "book").with("year", "circa 1900");
        let (accepted, messages) = run(FieldValidator::Year, &mut entry, false).await;
        assert!(!accepted);
        assert_eq!(messages, vec!["year 'circa 1900' is not an integer."]);

        let mut entry = Entry::new("a", "book").with("year", SENTINEL);
        assert_eq!(run(FieldValidator::Year, &mut entry, false).await, (false, vec![]));
    }

    #[tokio::test]
    async fn pages_rules() {
        let mut entry = Entry::new("p", "inproceedings").with("pages", "12--34");
        assert_eq!(run(FieldValidator::Pages, &mut entry, false).await, (true, vec![]));

        let mut entry = Entry::new("p", "inproceedings").with("pages", "34--12");
        let (accepted, messages) = run(FieldValidator::Pages, &mut entry, false).await;
        assert!(!accepted);
        assert_eq!(messages, vec!["the end page (12) is before the start page (34)."]);

        let mut entry = Entry::new("p", "inproceedings").with("pages", "abc");
        assert!(!run(FieldValidator::Pages, &mut entry, false).await.0);

        let mut entry = Entry::new("p", "inproceedings").with("pages", SENTINEL);
        assert_eq!(run(FieldValidator::Pages, &mut entry, false).await, (false, vec![]));
    }

    #[tokio::test]
    async fn pages_separator_is_rewritten_only_when_fixing() {
        let mut entry = Entry::new("p", "inproceedings").with("pages", "12-34");
        assert!(run(FieldValidator::Pages, &mut entry, false).await.0);
        assert_eq!(entry.get("pages"), Some("12-34"));

        assert!(run(FieldValidator::Pages, &mut entry, true).await.0);
        assert_eq!(entry.get("pages"), Some("12--34"));
    }

    #[tokio::test]
    async fn isbn10_needs_an_old_year() {
        let mut entry = Entry::new("b", "book")
            .with("isbn", "0-19-853453-1")
            .with("year", "2010");
        let (accepted, messages) = run(FieldValidator::Isbn, &mut entry, false).await;
        assert!(!accepted);
        assert!(messages[0].contains("issued only before 2007"));

        let mut entry = Entry::new("b", "book")
            .with("isbn", "0-19-853453-1")
            .with("year", "1996");
        assert_eq!(run(FieldValidator::Isbn, &mut entry, false).await, (true, vec![]));
        assert_eq!(entry.get("isbn"), Some("0-19-853453-1"));

        let mut entry = Entry::new("b", "book").with("isbn", "0-19-853453-1");
        assert!(!run(FieldValidator::Isbn, &mut entry, false).await.0);
    }

    #[tokio::test]
    async fn isbn13_is_accepted_by_shape() {
        let mut entry = Entry::new("b", "book")
            .with("isbn", "978-0-19-853453-6")
            .with("year", "2010");
        let (accepted, messages) = run(FieldValidator::Isbn, &mut entry, false).await;
        assert!(accepted);
        assert_eq!(messages, vec!["ISBN-13 (978-0-19-853453-6) has a wrong check digit."]);
        assert_eq!(entry.get("isbn"), Some("978-0-19-853453-6"));

        let mut entry = Entry::new("b", "book")
            .with("isbn", "9780306406157")
            .with("year", "1990");
        let (accepted, messages) = run(FieldValidator::Isbn, &mut entry, false).await;
        assert!(accepted);
        assert!(messages[0].contains("issued only after 2007"));
        assert_eq!(entry.get("isbn"), Some("978-0-3064-0615-7"));
    }

    #[tokio::test]
    async fn unknown_isbn_shape() {
        let mut entry = Entry::new("b", "book").with("isbn", "12345");
        let (accepted, messages) = run(FieldValidator::Isbn, &mut entry, false).await;
        assert!(!accepted);
        assert_eq!(messages, vec!["invalid ISBN '12345'."]);

        let mut entry = Entry::new("b", "book").with("isbn", SENTINEL);
        assert_eq!(run(FieldValidator::Isbn, &mut entry, true).await, (false, vec![]));
    }

    #[tokio::test]
    async fn isbn_metadata_fills_missing_fields() {
        let citations = CitationDatabase::new();
        let lookups = Lookups {
            isbn: Arc::new(FixedMeta),
            ..Lookups::offline()
        };
        let mut ctx = context(&citations, lookups);
        let mut entry = Entry::new("b", "book")
            .with("isbn", "0-19-853453-1")
            .with("publisher", SENTINEL);

        assert!(FieldValidator::Isbn.validate(&mut ctx, &mut entry, true).await);
        assert_eq!(entry.get("year"), Some("1996"));
        assert_eq!(entry.get("publisher"), Some("Oxford University Press"));
        assert_eq!(ctx.log.diagnostics().len(), 2);
    }

    #[tokio::test]
    async fn issn_prefers_the_run_cache() {
        let citations = CitationDatabase::new();
        let remote = Arc::new(FixedIssn(
            LookupOutcome::Found("9999-9999".to_string()),
            AtomicUsize::new(0),
        ));
        let lookups = Lookups {
            issn: remote.clone(),
            ..Lookups::offline()
        };
        let mut cache = IssnCache::new();
        cache.insert("Nature", "0028-0836");
        let mut ctx = context(&citations, lookups).with_issn_cache(cache);

        let mut cached = Entry::new("a", "article")
            .with("journal", "Nature")
            .with("issn", SENTINEL);
        assert!(FieldValidator::Issn.validate(&mut ctx, &mut cached, true).await);
        assert_eq!(cached.get("issn"), Some("0028-0836"));
        assert_eq!(remote.1.load(Ordering::SeqCst), 0);

        let mut looked_up = Entry::new("b", "article")
            .with("journal", "Science")
            .with("issn", SENTINEL);
        assert!(FieldValidator::Issn.validate(&mut ctx, &mut looked_up, true).await);
        assert_eq!(looked_up.get("issn"), Some("9999-9999"));
        assert_eq!(ctx.issn_cache.get("Science"), Some("9999-9999"));
        assert_eq!(remote.1.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_issn_from_lookup_is_not_stored() {
        let citations = CitationDatabase::new();
        let lookups = Lookups {
            issn: Arc::new(FixedIssn(
                LookupOutcome::Found("0036-8075 (print)".to_string()),
                AtomicUsize::new(0),
            )),
            ..Lookups::offline()
        };
        let mut ctx = context(&citations, lookups);
        let mut entry = Entry::new("a", "article")
            .with("journal", "Science")
            .with("issn", SENTINEL);

        assert!(!FieldValidator::Issn.validate(&mut ctx, &mut entry, true).await);
        assert_eq!(entry.get("issn"), Some(SENTINEL));
        assert_eq!(ctx.issn_cache.get("Science"), None);
        assert!(ctx.log.has("a", DiagnosticKind::LookupFailed, "issn"));
    }

    #[tokio::test]
    async fn failed_issn_lookup_degrades_to_not_found() {
        let citations = CitationDatabase::new();
        let lookups = Lookups {
            issn: Arc::new(FixedIssn(
                LookupOutcome::Failed("timeout".to_string()),
                AtomicUsize::new(0),
            )),
            ..Lookups::offline()
        };
        let mut ctx = context(&citations, lookups);
        let mut entry = Entry::new("a", "article")
            .with("journal", "Science")
            .with("issn", "12");

        assert!(!FieldValidator::Issn.validate(&mut ctx, &mut entry, true).await);
        let messages: Vec<&str> = ctx.log.diagnostics().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["invalid ISSN format '12'.", "ISSN for 'Science' not found."]
        );
        assert_eq!(entry.get("issn"), Some("12"));
    }

    #[tokio::test]
    async fn booktitle_must_not_be_cut_off() {
        let mut entry = Entry::new("c", "inproceedings")
            .with("booktitle", "Proceedings of the International Conference on");
        assert!(!run(FieldValidator::Booktitle, &mut entry, false).await.0);

        let mut entry = Entry::new("c", "inproceedings")
            .with("booktitle", "Proceedings of the Conference on Machine Translation");
        assert!(run(FieldValidator::Booktitle, &mut entry, false).await.0);
    }

    #[tokio::test]
    async fn month_names() {
        let mut entry = Entry::new("c", "inproceedings").with("month", "February");
        assert_eq!(run(FieldValidator::Month, &mut entry, false).await, (true, vec![]));

        let mut entry = Entry::new("c", "inproceedings").with("month", "Feburay");
        let (accepted, messages) = run(FieldValidator::Month, &mut entry, false).await;
        assert!(!accepted);
        assert_eq!(messages, vec!["month 'Feburay' should be written as 'February'."]);
        assert_eq!(entry.get("month"), Some("Feburay"));

        assert!(run(FieldValidator::Month, &mut entry, true).await.0);
        assert_eq!(entry.get("month"), Some("February"));

        let mut entry = Entry::new("c", "inproceedings").with("month", "Brumaire");
        assert!(!run(FieldValidator::Month, &mut entry, false).await.0);
    }

    #[tokio::test]
    async fn month_macro_is_an_error_until_renamed() {
        let citations = CitationDatabase::new();
        let mut ctx = context(&citations, Lookups::offline());
        let mut entry = Entry::new("c", "inproceedings").with("month", "jun");

        assert!(!FieldValidator::Month.validate(&mut ctx, &mut entry, false).await);
        assert_eq!(ctx.log.error_count(), 1);
        assert!(ctx.log.has("c", DiagnosticKind::MalformedField, "month"));
        assert_eq!(entry.get("month"), Some("jun"));

        let mut ctx = context(&citations, Lookups::offline());
        assert!(FieldValidator::Month.validate(&mut ctx, &mut entry, true).await);
        assert_eq!(ctx.log.error_count(), 1);
        assert_eq!(entry.get("month"), Some("June"));
    }

    #[tokio::test]
    async fn address_renames_only_when_fixing() {
        let mut entry = Entry::new("c", "inproceedings").with("address", "Berlin, DEU");
        assert!(run(FieldValidator::Address, &mut entry, false).await.0);
        assert_eq!(entry.get("address"), Some("Berlin, DEU"));

        assert!(run(FieldValidator::Address, &mut entry, true).await.0);
        assert_eq!(entry.get("address"), Some("Berlin, Germany"));

        let mut entry = Entry::new("c", "inproceedings").with("address", "Prague, Czechia");
        assert!(!run(FieldValidator::Address, &mut entry, true).await.0);
    }

    #[tokio::test]
    async fn author_initials_are_warnings() {
        let mut entry = Entry::new("a", "article").with("author", "Smith, J. and Doe, Jane");
        let (accepted, messages) = run(FieldValidator::Author, &mut entry, false).await;
        assert!(accepted);
        assert_eq!(
            messages,
            vec![
                "author 'Smith, J.' has only an initial as the first name.",
                "author 'Smith, J.' has a name part ending with a period.",
            ]
        );

        let mut entry = Entry::new("a", "article").with("author", "Doe, Jane and others");
        assert_eq!(run(FieldValidator::Author, &mut entry, false).await, (true, vec![]));
    }

    #[tokio::test]
    async fn doi_shape() {
        let mut entry = Entry::new("d", "article").with("doi", "10.18653/v1/P19-1001");
        assert!(run(FieldValidator::Doi, &mut entry, true).await.0);

        let mut entry = Entry::new("d", "article").with("doi", "doi:1234");
        let (accepted, messages) = run(FieldValidator::Doi, &mut entry, false).await;
        assert!(!accepted);
        assert_eq!(messages, vec!["DOI 'doi:1234' is malformed."]);
    }

    #[tokio::test]
    async fn doi_search_never_guesses() {
        let citations = CitationDatabase::new();
        let ambiguous = Lookups {
            doi: Arc::new(FixedDois(vec!["10.1000/a", "10.1000/b"])),
            ..Lookups::offline()
        };
        let mut ctx = context(&citations, ambiguous);
        let mut entry = Entry::new("d", "article")
            .with("title", "Attention")
            .with("doi", SENTINEL);
        assert!(!FieldValidator::Doi.validate(&mut ctx, &mut entry, true).await);
        assert_eq!(entry.get("doi"), Some(SENTINEL));
        assert!(ctx.log.has("d", DiagnosticKind::LookupFailed, "doi"));

        let unique = Lookups {
            doi: Arc::new(FixedDois(vec!["10.1000/a"])),
            ..Lookups::offline()
        };
        let mut ctx = context(&citations, unique);
        assert!(FieldValidator::Doi.validate(&mut ctx, &mut entry, true).await);
        assert_eq!(entry.get("doi"), Some("10.1000/a"));
    }
}
