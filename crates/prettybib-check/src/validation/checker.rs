use prettybib_core::{
    Entry, collapse_whitespace, normalize_authors, normalize_booktitle, normalize_title,
};
use tracing::info;

use crate::index::ValueIndex;
use crate::validation::context::CheckContext;
use crate::validation::dispatch;
use crate::validation::log::DiagnosticKind;
use crate::validation::presence::check_field;

/// Values collected during a pass, for near-duplicate clustering.
#[derive(Debug, Clone, Default)]
pub struct FieldIndexes {
    /// Individual authors.
    pub authors: ValueIndex,
    pub journals: ValueIndex,
    /// Booktitle signatures, see [`normalize_booktitle`].
    pub booktitles: ValueIndex,
}

/// Collapses whitespace in every value and normalizes author names.
pub(crate) fn tidy_fields(entry: &mut Entry) {
    for value in entry.fields.values_mut() {
        *value = collapse_whitespace(value);
    }
    if let Some(author) = entry.get("author") {
        let normalized = normalize_authors(author);
        entry.set("author", normalized);
    }
}

/// Checks a whole database in input order.
pub struct DatabaseChecker {
    try_fix: bool,
    indexes: FieldIndexes,
    titles: ValueIndex,
}

impl DatabaseChecker {
    pub fn new(try_fix: bool) -> Self {
        Self {
            try_fix,
            indexes: FieldIndexes::default(),
            titles: ValueIndex::new(),
        }
    }

    pub async fn check_entry(&mut self, ctx: &mut CheckContext<'_>, entry: &mut Entry) {
        tidy_fields(entry);
        self.index(entry);

        check_field(ctx, entry, "author", self.try_fix, false).await;
        check_field(ctx, entry, "title", self.try_fix, false).await;
        self.detect_duplicate_title(ctx, entry);

        dispatch::check_entry(ctx, entry, self.try_fix).await;
    }

    fn index(&mut self, entry: &Entry) {
        if let Some(authors) = entry.value("author") {
            for author in authors.split(" and ") {
                self.indexes.authors.insert(author, &entry.id);
            }
        }
        if let Some(journal) = entry.value("journal") {
            self.indexes.journals.insert(journal, &entry.id);
        }
        if let Some(booktitle) = entry.value("booktitle") {
            self.indexes
                .booktitles
                .insert(&normalize_booktitle(booktitle), &entry.id);
        }
    }

    fn detect_duplicate_title(&mut self, ctx: &mut CheckContext<'_>, entry: &Entry) {
        let Some(title) = entry.title() else {
            return;
        };
        let key = normalize_title(title);
        if let Some(earlier) = self.titles.get(&key) {
            ctx.log.error(
                entry,
                DiagnosticKind::DuplicateTitle,
                Some("title"),
                format!(
                    "reference with this title is already in the database as {}.",
                    earlier.join(", ")
                ),
            );
        }
        self.titles.insert(&key, &entry.id);
    }

    /// Hands back the clustering indexes and records duplicate-title groups
    /// in the log.
    pub fn finish(self, ctx: &mut CheckContext<'_>) -> FieldIndexes {
        for (_, ids) in self.titles.iter() {
            if ids.len() > 1 {
                ctx.log.record_duplicate_titles(ids.to_vec());
            }
        }
        self.indexes
    }
}

pub async fn check_database(
    ctx: &mut CheckContext<'_>,
    entries: &mut [Entry],
    try_fix: bool,
) -> FieldIndexes {
    let mut checker = DatabaseChecker::new(try_fix);
    for entry in entries.iter_mut() {
        checker.check_entry(ctx, entry).await;
    }
    let indexes = checker.finish(ctx);
    info!(
        "checked {} entries: {} errors, {} distinct authors, {} journals, {} venues",
        entries.len(),
        ctx.log.error_count(),
        indexes.authors.len(),
        indexes.journals.len(),
        indexes.booktitles.len()
    );
    indexes
}
