//! Network collaborators used for best-effort repairs.
//!
//! The checker only sees the three lookup traits below. Every failure is
//! turned into [`LookupOutcome::Failed`] so a broken service degrades to
//! "not found" without aborting a run.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use prettybib_core::config::LookupConfig;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http::{DiskCache, RateLimitedClient};
use crate::identifiers::Isbn;

pub mod crossref;
pub mod dbpedia;
pub mod openlibrary;

pub use crossref::CrossRefSource;
pub use dbpedia::DbpediaSource;
pub use openlibrary::OpenLibrarySource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome<T> {
    Found(T),
    NotFound,
    Failed(String),
}

impl<T> LookupOutcome<T> {
    /// Collapses `NotFound` and `Failed` into `None`.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound | Self::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl<T> From<Result<Option<T>>> for LookupOutcome<T> {
    fn from(result: Result<Option<T>>) -> Self {
        match result {
            Ok(Some(value)) => Self::Found(value),
            Ok(None) => Self::NotFound,
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsbnMetadata {
    pub year: Option<String>,
    pub publisher: Option<String>,
}

#[async_trait]
pub trait IsbnMetadataLookup: Send + Sync {
    async fn isbn_meta(&self, isbn: &Isbn) -> LookupOutcome<IsbnMetadata>;
}

#[async_trait]
pub trait IssnLookup: Send + Sync {
    async fn lookup_issn(&self, journal: &str) -> LookupOutcome<String>;
}

#[async_trait]
pub trait DoiSearch: Send + Sync {
    /// Candidate DOIs for works whose title matches `title`.
    async fn search_doi_by_title(&self, title: &str) -> LookupOutcome<Vec<String>>;
}

/// Stand-in for every collaborator when running without network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

#[async_trait]
impl IsbnMetadataLookup for Offline {
    async fn isbn_meta(&self, _isbn: &Isbn) -> LookupOutcome<IsbnMetadata> {
        LookupOutcome::NotFound
    }
}

#[async_trait]
impl IssnLookup for Offline {
    async fn lookup_issn(&self, _journal: &str) -> LookupOutcome<String> {
        LookupOutcome::NotFound
    }
}

#[async_trait]
impl DoiSearch for Offline {
    async fn search_doi_by_title(&self, _title: &str) -> LookupOutcome<Vec<String>> {
        LookupOutcome::NotFound
    }
}

/// The set of collaborators handed to a checking run.
#[derive(Clone)]
pub struct Lookups {
    pub isbn: Arc<dyn IsbnMetadataLookup>,
    pub issn: Arc<dyn IssnLookup>,
    pub doi: Arc<dyn DoiSearch>,
}

impl Default for Lookups {
    fn default() -> Self {
        Self::offline()
    }
}

impl Lookups {
    pub fn offline() -> Self {
        Self {
            isbn: Arc::new(Offline),
            issn: Arc::new(Offline),
            doi: Arc::new(Offline),
        }
    }

    /// HTTP-backed collaborators built from `[lookup]` settings.
    pub fn from_config(config: &LookupConfig, cache_root: &Path) -> Result<Self> {
        if !config.enabled {
            return Ok(Self::offline());
        }

        let user_agent = match &config.polite_email {
            Some(email) => format!("prettybib/0.1 (mailto:{email})"),
            None => "prettybib/0.1".to_string(),
        };
        let client = || {
            RateLimitedClient::new(
                Duration::from_millis(config.min_interval_ms),
                config.max_retries,
                &user_agent,
                config.timeout_secs.map(Duration::from_secs),
            )
        };
        let ttl = Duration::from_secs(config.cache_ttl_hours * 3600);
        let cache = |namespace: &str| {
            config
                .cache_enabled
                .then(|| DiskCache::new(cache_root, namespace, ttl))
        };

        Ok(Self {
            isbn: Arc::new(OpenLibrarySource::new(
                client()?,
                cache("openlibrary"),
                &config.openlibrary_url,
            )),
            issn: Arc::new(DbpediaSource::new(
                client()?,
                cache("dbpedia"),
                &config.dbpedia_url,
            )),
            doi: Arc::new(CrossRefSource::new(
                client()?,
                cache("crossref"),
                &config.crossref_url,
            )),
        })
    }
}
