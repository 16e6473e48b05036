use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::error::{CheckError, Result};
use crate::http::{DiskCache, RateLimitedClient};
use crate::sources::{IssnLookup, LookupOutcome};

/// ISSN lookup by journal name against the DBpedia SPARQL endpoint.
pub struct DbpediaSource {
    client: RateLimitedClient,
    cache: Option<DiskCache>,
    endpoint: String,
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

pub fn issn_query(journal: &str) -> String {
    format!(
        r#"PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX dbo: <http://dbpedia.org/ontology/>
SELECT ?journal ?issn
WHERE {{
    ?journal a dbo:AcademicJournal ;
             rdfs:label ?journal_name ;
             dbo:issn ?issn .
    FILTER(str(?journal_name) = "{}")
}}
LIMIT 1"#,
        escape_literal(journal)
    )
}

impl DbpediaSource {
    pub fn new(client: RateLimitedClient, cache: Option<DiskCache>, endpoint: &str) -> Self {
        Self {
            client,
            cache,
            endpoint: endpoint.to_string(),
        }
    }

    pub async fn find_issn(&self, journal: &str) -> Result<Option<String>> {
        let cache_key = format!("issn:{journal}");
        if let Some(cache) = &self.cache
            && let Some(cached) = cache.get::<Option<String>>(&cache_key).await
        {
            return Ok(cached);
        }

        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| CheckError::Parse(format!("invalid SPARQL endpoint: {e}")))?;
        url.query_pairs_mut()
            .append_pair("query", &issn_query(journal))
            .append_pair("format", "application/sparql-results+json");

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/sparql-results+json"),
        );
        let val: Value = self.client.get_json_with_headers(url.as_str(), headers).await?;
        let bindings = val["results"]["bindings"]
            .as_array()
            .ok_or_else(|| CheckError::Parse("SPARQL response without bindings".to_string()))?;

        let issn = bindings
            .first()
            .and_then(|binding| binding["issn"]["value"].as_str())
            .map(|s| s.trim().to_string());

        if let Some(cache) = &self.cache {
            cache.set(&cache_key, &issn).await;
        }
        Ok(issn)
    }
}

#[async_trait]
impl IssnLookup for DbpediaSource {
    async fn lookup_issn(&self, journal: &str) -> LookupOutcome<String> {
        let outcome: LookupOutcome<String> = self.find_issn(journal).await.into();
        if let LookupOutcome::Failed(reason) = &outcome {
            debug!("dbpedia ISSN lookup for '{}' failed: {}", journal, reason);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::time::Duration;

    fn source(endpoint: &str) -> DbpediaSource {
        let client = RateLimitedClient::new(Duration::ZERO, 0, "prettybib-test", None).unwrap();
        DbpediaSource::new(client, None, endpoint)
    }

    #[test]
    fn query_escapes_quotes() {
        let query = issn_query(r#"The "Quoted" Journal"#);
        assert!(query.contains(r#"FILTER(str(?journal_name) = "The \"Quoted\" Journal")"#));
        assert!(query.contains("dbo:AcademicJournal"));
    }

    #[tokio::test]
    async fn first_binding_wins() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/sparql")
            .match_query(Matcher::Regex("query=".to_string()))
            .with_status(200)
            .with_header("content-type", "application/sparql-results+json")
            .with_body(
                r#"{"results": {"bindings": [
                    {"journal": {"value": "http://dbpedia.org/resource/Nature_(journal)"},
                     "issn": {"value": "0028-0836"}}
                ]}}"#,
            )
            .create_async()
            .await;

        let outcome = source(&format!("{}/sparql", server.url()))
            .lookup_issn("Nature")
            .await;
        assert_eq!(outcome, LookupOutcome::Found("0028-0836".to_string()));
    }

    #[tokio::test]
    async fn empty_bindings_are_not_found() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/sparql")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results": {"bindings": []}}"#)
            .create_async()
            .await;

        let outcome = source(&format!("{}/sparql", server.url()))
            .lookup_issn("Journal of Nothing")
            .await;
        assert_eq!(outcome, LookupOutcome::NotFound);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_failure() {
        let outcome = source("http://127.0.0.1:9/sparql").lookup_issn("Nature").await;
        assert!(outcome.is_failed());
    }
}
