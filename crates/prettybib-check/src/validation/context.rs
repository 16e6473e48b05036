use std::collections::HashMap;

use chrono::Datelike;
use prettybib_core::{CitationDatabase, Entry, EntryKind};
use tracing::warn;

use crate::identifiers::Issn;
use crate::sources::Lookups;
use crate::validation::log::CheckLog;

/// Journal name → ISSN, seeded from the input and grown by lookups.
#[derive(Debug, Clone, Default)]
pub struct IssnCache {
    by_journal: HashMap<String, String>,
}

impl IssnCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the cache from articles that already carry a well-formed ISSN.
    /// The first ISSN seen for a journal is kept.
    pub fn from_entries(entries: &[Entry]) -> Self {
        let mut cache = Self::new();
        for entry in entries.iter().filter(|e| e.kind() == EntryKind::Article) {
            let (Some(journal), Some(issn)) = (entry.value("journal"), entry.value("issn")) else {
                continue;
            };
            if !Issn::is_valid(issn) {
                continue;
            }
            match cache.by_journal.get(journal) {
                Some(known) if known != issn => {
                    warn!(
                        "journal '{}' has more than one ISSN: keeping {}, ignoring {} from {}",
                        journal, known, issn, entry.id
                    );
                }
                Some(_) => {}
                None => {
                    cache.insert(journal, issn);
                }
            }
        }
        cache
    }

    pub fn get(&self, journal: &str) -> Option<&str> {
        self.by_journal.get(journal).map(String::as_str)
    }

    pub fn insert(&mut self, journal: &str, issn: &str) {
        self.by_journal.insert(journal.to_string(), issn.to_string());
    }

    pub fn len(&self) -> usize {
        self.by_journal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_journal.is_empty()
    }
}

/// Everything one checking run reads from or accumulates into.
pub struct CheckContext<'a> {
    pub citations: &'a CitationDatabase,
    pub lookups: Lookups,
    pub issn_cache: IssnCache,
    pub log: CheckLog,
    pub current_year: i32,
}

impl<'a> CheckContext<'a> {
    pub fn new(citations: &'a CitationDatabase, lookups: Lookups) -> Self {
        Self {
            citations,
            lookups,
            issn_cache: IssnCache::new(),
            log: CheckLog::new(),
            current_year: chrono::Local::now().year(),
        }
    }

    pub fn with_issn_cache(mut self, issn_cache: IssnCache) -> Self {
        self.issn_cache = issn_cache;
        self
    }

    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_from_articles_with_valid_issn() {
        let entries = vec![
            Entry::new("a", "article")
                .with("journal", "Nature")
                .with("issn", "0028-0836"),
            Entry::new("b", "article")
                .with("journal", "Nature")
                .with("issn", "1476-4687"),
            Entry::new("c", "article")
                .with("journal", "Broken")
                .with("issn", "12-34"),
            Entry::new("d", "inproceedings")
                .with("journal", "Proceedings")
                .with("issn", "1234-5678"),
            Entry::new("e", "article").with("issn", "2049-3630"),
        ];
        let cache = IssnCache::from_entries(&entries);
        assert_eq!(cache.get("Nature"), Some("0028-0836"));
        assert_eq!(cache.get("Broken"), None);
        assert_eq!(cache.get("Proceedings"), None);
        assert_eq!(cache.len(), 1);
    }
}
