use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{CoreError, Result};
use crate::formats::parse_bibtex;
use crate::models::Entry;
use crate::normalize::normalize_title;

/// Trusted records keyed by normalized title.
///
/// Filled once from curated anthologies before checking starts and only read
/// afterwards. On a title collision the later record wins.
#[derive(Debug, Clone, Default)]
pub struct CitationDatabase {
    by_title: HashMap<String, Entry>,
}

impl CitationDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record; records without a title cannot be joined and are ignored.
    pub fn insert(&mut self, entry: Entry) -> bool {
        let Some(title) = entry.title() else {
            return false;
        };
        self.by_title.insert(normalize_title(title), entry);
        true
    }

    pub fn lookup(&self, title: &str) -> Option<&Entry> {
        self.by_title.get(&normalize_title(title))
    }

    /// Trusted record for the title of `entry`, if any.
    pub fn lookup_entry(&self, entry: &Entry) -> Option<&Entry> {
        entry.title().and_then(|title| self.lookup(title))
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }

    /// Loads one anthology file, returning the number of records kept.
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        if !path.exists() {
            return Err(CoreError::AnthologyNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let outcome = parse_bibtex(&contents);
        if !outcome.skipped.is_empty() {
            warn!(
                "{}: skipped {} unparsable records",
                path.display(),
                outcome.skipped.len()
            );
        }

        let mut loaded = 0usize;
        for entry in outcome.entries {
            if self.insert(entry) {
                loaded += 1;
            }
        }
        info!("loaded {} records from anthology {}", loaded, path.display());
        Ok(loaded)
    }

    /// Loads every anthology that can be read. Unreadable files are logged
    /// and skipped so one bad path does not stop a run.
    pub fn load_anthologies<P: AsRef<Path>>(&mut self, paths: &[P]) -> usize {
        let mut total = 0usize;
        for path in paths {
            let path = path.as_ref();
            match self.load_file(path) {
                Ok(loaded) => total += loaded,
                Err(e) => warn!("skipping anthology {}: {}", path.display(), e),
            }
        }
        total
    }
}

impl FromIterator<Entry> for CitationDatabase {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut db = Self::new();
        for entry in iter {
            db.insert(entry);
        }
        db
    }
}
