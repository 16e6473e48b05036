use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CheckError, Result};

static REGISTRANT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{2}\.[0-9]{4,5}$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doi {
    pub raw: String,
    pub prefix: String,
    pub suffix: String,
}

impl Doi {
    /// Accepts a bare DOI whose registrant prefix looks like `10.1234`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (prefix, suffix) = input
            .split_once('/')
            .ok_or_else(|| CheckError::InvalidDoi(input.to_string()))?;

        if !REGISTRANT_REGEX.is_match(prefix) {
            return Err(CheckError::InvalidDoi(input.to_string()));
        }

        Ok(Self {
            raw: input.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    pub fn url(&self) -> String {
        format!("https://doi.org/{}", self.raw)
    }
}
