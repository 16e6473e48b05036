use async_trait::async_trait;
use prettybib_core::normalize_title;
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::error::{CheckError, Result};
use crate::http::{DiskCache, RateLimitedClient};
use crate::identifiers::Doi;
use crate::sources::{DoiSearch, LookupOutcome};

const SEARCH_ROWS: &str = "5";

/// DOI discovery through the CrossRef works API.
pub struct CrossRefSource {
    client: RateLimitedClient,
    cache: Option<DiskCache>,
    base_url: String,
}

impl CrossRefSource {
    pub fn new(client: RateLimitedClient, cache: Option<DiskCache>, base_url: &str) -> Self {
        Self {
            client,
            cache,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// DOIs of works whose normalized title equals the normalized `title`.
    pub async fn search_by_title(&self, title: &str) -> Result<Vec<String>> {
        let wanted = normalize_title(title);
        let cache_key = format!("title:{wanted}");
        if let Some(cache) = &self.cache
            && let Some(cached) = cache.get::<Vec<String>>(&cache_key).await
        {
            return Ok(cached);
        }

        let mut url = Url::parse(&format!("{}/works", self.base_url))
            .map_err(|e| CheckError::Parse(format!("invalid CrossRef base URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("query.title", title)
            .append_pair("rows", SEARCH_ROWS)
            .append_pair("select", "DOI,title");

        let val: Value = self.client.get_json(url.as_str()).await?;
        let items = val["message"]["items"]
            .as_array()
            .ok_or_else(|| CheckError::Parse("CrossRef response without items".to_string()))?;

        let mut dois: Vec<String> = Vec::new();
        for item in items {
            let matches_title = item["title"]
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(Value::as_str)
                .any(|candidate| normalize_title(candidate) == wanted);
            if !matches_title {
                continue;
            }
            if let Some(doi) = item["DOI"].as_str().and_then(|s| Doi::parse(s).ok())
                && !dois.contains(&doi.raw)
            {
                dois.push(doi.raw);
            }
        }

        if let Some(cache) = &self.cache {
            cache.set(&cache_key, &dois).await;
        }
        Ok(dois)
    }
}

#[async_trait]
impl DoiSearch for CrossRefSource {
    async fn search_doi_by_title(&self, title: &str) -> LookupOutcome<Vec<String>> {
        match self.search_by_title(title).await {
            Ok(dois) if dois.is_empty() => LookupOutcome::NotFound,
            Ok(dois) => LookupOutcome::Found(dois),
            Err(e) => {
                debug!("crossref search for '{}' failed: {}", title, e);
                LookupOutcome::Failed(e.to_string())
            }
        }
    }
}
