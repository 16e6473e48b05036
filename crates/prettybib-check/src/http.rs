//! Shared HTTP plumbing for the lookup services.
//!
//! Each service owns one [`RateLimitedClient`] so requests to the same host
//! are spaced out, and optionally one [`DiskCache`] namespace so repeated runs
//! over the same database do not hit the network again.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::debug;

use crate::error::{CheckError, Result};

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

// ─── RateLimitedClient ────────────────────────────────────────────────────────

/// What to do after one request.
enum Step {
    Done(String),
    Retry(Duration),
    Fail(CheckError),
}

pub struct RateLimitedClient {
    client: reqwest::Client,
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
    max_retries: u32,
}

impl RateLimitedClient {
    pub fn new(
        min_interval: Duration,
        max_retries: u32,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent).gzip(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            min_interval,
            next_slot: Mutex::new(None),
            max_retries,
        })
    }

    /// Waits until `min_interval` has passed since the previous request.
    async fn throttle(&self) {
        let mut slot = self.next_slot.lock().await;
        if let Some(at) = *slot {
            let now = Instant::now();
            if at > now {
                sleep(at - now).await;
            }
        }
        *slot = Some(Instant::now() + self.min_interval);
    }

    async fn attempt(&self, url: &str, headers: &HeaderMap, attempt: u32) -> Step {
        let response = match self.client.get(url).headers(headers.clone()).send().await {
            Ok(response) => response,
            Err(e) if attempt < self.max_retries => {
                debug!("request to {} failed ({}), retrying", url, e);
                return Step::Retry(Duration::from_secs(1 << attempt));
            }
            Err(e) => return Step::Fail(e.into()),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let wait = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return if attempt < self.max_retries {
                Step::Retry(Duration::from_secs(wait))
            } else {
                Step::Fail(CheckError::RateLimit(url.to_string(), wait))
            };
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Step::Fail(CheckError::ApiError(
                url.to_string(),
                format!("HTTP {}: {}", status.as_u16(), body),
            ));
        }
        match response.text().await {
            Ok(body) => Step::Done(body),
            Err(e) => Step::Fail(e.into()),
        }
    }

    /// GET `url` and return the body, retrying transport errors with
    /// exponential backoff and 429 answers after their `Retry-After`.
    pub async fn fetch(&self, url: &str, headers: HeaderMap) -> Result<String> {
        let mut attempt = 0;
        loop {
            self.throttle().await;
            match self.attempt(url, &headers, attempt).await {
                Step::Done(body) => return Ok(body),
                Step::Fail(e) => return Err(e),
                Step::Retry(wait) => {
                    sleep(wait).await;
                    attempt += 1;
                }
            }
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get_json_with_headers(url, HeaderMap::new()).await
    }

    pub async fn get_json_with_headers<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<T> {
        let body = self.fetch(url, headers).await?;
        serde_json::from_str(&body).map_err(|e| CheckError::Parse(e.to_string()))
    }
}

// ─── DiskCache ────────────────────────────────────────────────────────────────

/// JSON files keyed by a hash of the request, one directory per service.
pub struct DiskCache {
    dir: PathBuf,
    ttl: Duration,
}

#[derive(Serialize, Deserialize)]
struct Cached<T> {
    expires_at: u64,
    value: T,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl DiskCache {
    pub fn new(root: &Path, namespace: &str, ttl: Duration) -> Self {
        let dir = root.join(namespace);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            debug!("cache directory {} unavailable: {}", dir.display(), e);
        }
        Self { dir, ttl }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        self.dir.join(format!("{:016x}.json", hasher.finish()))
    }

    /// Cached value for `key`, dropping it when expired or unreadable.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let bytes = tokio::fs::read(&path).await.ok()?;
        match serde_json::from_slice::<Cached<T>>(&bytes) {
            Ok(cached) if cached.expires_at > unix_now() => Some(cached.value),
            _ => {
                let _ = tokio::fs::remove_file(&path).await;
                None
            }
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) {
        let cached = Cached {
            expires_at: unix_now() + self.ttl.as_secs(),
            value,
        };
        let Ok(bytes) = serde_json::to_vec(&cached) else {
            return;
        };
        if let Err(e) = tokio::fs::write(self.path_for(key), bytes).await {
            debug!("cache write for '{}' failed: {}", key, e);
        }
    }
}
