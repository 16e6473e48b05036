//! Required fields and repairs per entry type.

use prettybib_core::{Entry, EntryKind};

use crate::validation::checker::tidy_fields;
use crate::validation::context::CheckContext;
use crate::validation::log::DiagnosticKind;
use crate::validation::presence::check_field;

pub const ARXIV_ISSN: &str = "2331-8422";
pub const PREPRINT_JOURNAL: &str = "CoRR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub field: &'static str,
    /// Whether a missing value may be copied from the citation database.
    pub try_find: bool,
}

const fn req(field: &'static str, try_find: bool) -> Requirement {
    Requirement { field, try_find }
}

const PREPRINT: &[Requirement] = &[req("url", false), req("volume", false)];

const BOOK: &[Requirement] = &[
    req("isbn", false),
    req("publisher", false),
    req("year", false),
    req("url", false),
];

const INPROCEEDINGS: &[Requirement] = &[
    req("doi", true),
    req("booktitle", true),
    req("month", true),
    req("year", true),
    req("address", true),
    req("pages", true),
    req("publisher", true),
    req("url", false),
];

const TECHREPORT: &[Requirement] = &[
    req("month", true),
    req("year", true),
    req("address", true),
    req("institution", true),
    req("url", false),
];

pub fn is_preprint_journal(journal: &str) -> bool {
    journal == PREPRINT_JOURNAL || journal.starts_with("arXiv")
}

fn is_preprint(entry: &Entry) -> bool {
    entry.kind() == EntryKind::Article && entry.value("journal").is_some_and(is_preprint_journal)
}

/// Type-specific requirements of `entry`, in checking order.
pub fn requirements(entry: &Entry) -> Vec<Requirement> {
    match entry.kind() {
        EntryKind::Article => match entry.value("journal") {
            None => Vec::new(),
            Some(journal) if is_preprint_journal(journal) => PREPRINT.to_vec(),
            Some(_) => {
                let mut list = vec![req("doi", true), req("issn", false)];
                if entry.is_missing("volume") {
                    list.push(req("number", false));
                }
                list.extend([
                    req("pages", false),
                    req("publisher", false),
                    req("address", false),
                    req("url", false),
                ]);
                list
            }
        },
        EntryKind::Book => BOOK.to_vec(),
        EntryKind::InProceedings => INPROCEEDINGS.to_vec(),
        EntryKind::TechReport => TECHREPORT.to_vec(),
        EntryKind::Other(_) => Vec::new(),
    }
}

/// Every field that is present after `entry` has been checked.
pub fn required_fields(entry: &Entry) -> Vec<&'static str> {
    let mut fields = vec!["author", "title"];
    if is_preprint(entry) {
        fields.extend(["journal", "issn"]);
    }
    fields.extend(requirements(entry).into_iter().map(|r| r.field));
    fields
}

/// Replaces a preprint by its formal publication from the citation database.
/// The working id is kept so existing citations stay valid.
pub fn supersede_preprint(ctx: &mut CheckContext<'_>, entry: &mut Entry, try_fix: bool) -> bool {
    if !try_fix || !is_preprint(entry) {
        return false;
    }
    let Some(trusted) = ctx.citations.lookup_entry(entry).cloned() else {
        return false;
    };

    entry.replace_with(&trusted);
    tidy_fields(entry);
    ctx.log.info(
        entry,
        None,
        format!(
            "preprint found as a proper publication ({}), replacing.",
            trusted.id
        ),
    );
    true
}

/// Runs the type-specific checks of `entry`.
pub async fn check_entry(ctx: &mut CheckContext<'_>, entry: &mut Entry, try_fix: bool) {
    supersede_preprint(ctx, entry, try_fix);

    if entry.kind() == EntryKind::Article {
        if entry.is_missing("journal") {
            ctx.log.error(
                entry,
                DiagnosticKind::MissingField,
                Some("journal"),
                "journal title is missing.",
            );
            return;
        }
        if is_preprint(entry) {
            fix_preprint(ctx, entry);
        }
    }

    for requirement in requirements(entry) {
        check_field(ctx, entry, requirement.field, try_fix, requirement.try_find).await;
    }
}

fn fix_preprint(ctx: &mut CheckContext<'_>, entry: &mut Entry) {
    for (field, value) in [("journal", PREPRINT_JOURNAL), ("issn", ARXIV_ISSN)] {
        if entry.get(field) != Some(value) {
            entry.set(field, value);
            ctx.log
                .info(entry, Some(field), format!("{field} set to '{value}' for a preprint."));
        }
    }

    let Some(volume) = entry.value("volume").map(str::to_string) else {
        return;
    };
    if volume.starts_with("abs/") && entry.is_missing("url") {
        let url = format!("https://arxiv.org/{volume}");
        entry.set("url", url.as_str());
        ctx.log
            .info(entry, Some("url"), format!("url derived from volume: {url}."));
    }
}
