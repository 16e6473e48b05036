use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{CheckError, Result};
use crate::http::{DiskCache, RateLimitedClient};
use crate::identifiers::Isbn;
use crate::sources::{IsbnMetadata, IsbnMetadataLookup, LookupOutcome};

static YEAR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(1[5-9]|20)\d{2}\b").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OpenLibraryBook {
    pub title: String,
    pub publishers: Vec<String>,
    pub publish_date: Option<String>,
}

impl OpenLibraryBook {
    pub fn from_json(v: &Value) -> Self {
        let title = v
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let publishers = v
            .get("publishers")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|item| {
                        item.get("name")
                            .and_then(Value::as_str)
                            .or_else(|| item.as_str())
                    })
                    .map(ToOwned::to_owned)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let publish_date = v
            .get("publish_date")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);

        Self {
            title,
            publishers,
            publish_date,
        }
    }

    pub fn into_metadata(self) -> IsbnMetadata {
        let year = self
            .publish_date
            .as_deref()
            .and_then(|date| YEAR_REGEX.find(date))
            .map(|m| m.as_str().to_string());
        IsbnMetadata {
            year,
            publisher: self.publishers.into_iter().next(),
        }
    }
}

/// ISBN metadata from the Open Library books API.
pub struct OpenLibrarySource {
    client: RateLimitedClient,
    cache: Option<DiskCache>,
    base_url: String,
}

impl OpenLibrarySource {
    pub fn new(client: RateLimitedClient, cache: Option<DiskCache>, base_url: &str) -> Self {
        Self {
            client,
            cache,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_by_isbn(&self, isbn: &Isbn) -> Result<Option<OpenLibraryBook>> {
        let cache_key = format!("isbn:{}", isbn.isbn13);
        if let Some(cache) = &self.cache
            && let Some(cached) = cache.get::<OpenLibraryBook>(&cache_key).await
        {
            return Ok(Some(cached));
        }

        let mut url = Url::parse(&format!("{}/api/books", self.base_url))
            .map_err(|e| CheckError::Parse(format!("invalid Open Library base URL: {e}")))?;
        let bibkey = format!("ISBN:{}", isbn.isbn13);
        url.query_pairs_mut()
            .append_pair("bibkeys", &bibkey)
            .append_pair("format", "json")
            .append_pair("jscmd", "data");

        let json: Value = self.client.get_json(url.as_str()).await?;
        let Some(raw) = json.get(&bibkey) else {
            return Ok(None);
        };

        let book = OpenLibraryBook::from_json(raw);
        if let Some(cache) = &self.cache {
            cache.set(&cache_key, &book).await;
        }
        Ok(Some(book))
    }
}

#[async_trait]
impl IsbnMetadataLookup for OpenLibrarySource {
    async fn isbn_meta(&self, isbn: &Isbn) -> LookupOutcome<IsbnMetadata> {
        let outcome: LookupOutcome<IsbnMetadata> = self
            .fetch_by_isbn(isbn)
            .await
            .map(|book| book.map(OpenLibraryBook::into_metadata))
            .into();
        if let LookupOutcome::Failed(reason) = &outcome {
            debug!("openlibrary lookup for {} failed: {}", isbn.compact, reason);
        }
        outcome
    }
}
