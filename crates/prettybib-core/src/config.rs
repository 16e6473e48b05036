use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Root application configuration, loaded from `~/.config/prettybib/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub check: CheckConfig,
    pub lookup: LookupConfig,
    pub anthologies: AnthologyConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    pub try_fix: bool,
    pub author_threshold: f64,
    pub journal_threshold: f64,
    pub booktitle_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polite_email: Option<String>,
    pub min_interval_ms: u64,
    pub max_retries: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    pub cache_enabled: bool,
    pub cache_ttl_hours: u64,
    pub openlibrary_url: String,
    pub crossref_url: String,
    pub dbpedia_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthologyConfig {
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub indent: String,
    pub align_values: bool,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            try_fix: false,
            author_threshold: 0.8,
            journal_threshold: 0.8,
            booktitle_threshold: 0.9,
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            polite_email: None,
            min_interval_ms: 200,
            max_retries: 0,
            timeout_secs: None,
            cache_enabled: true,
            cache_ttl_hours: 7 * 24,
            openlibrary_url: "https://openlibrary.org".to_string(),
            crossref_url: "https://api.crossref.org".to_string(),
            dbpedia_url: "https://dbpedia.org/sparql".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            align_values: true,
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/prettybib/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("PRETTYBIB_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("prettybib")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    /// Directory for cached lookup responses.
    pub fn cache_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("prettybib")
    }
}
