use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CheckError, Result};

static ISSN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-?\d{3}[\dXx]$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issn(String);

impl Issn {
    pub fn parse(input: &str) -> Result<Self> {
        if ISSN_REGEX.is_match(input) {
            Ok(Self(input.to_string()))
        } else {
            Err(CheckError::InvalidIssn(input.to_string()))
        }
    }

    pub fn is_valid(input: &str) -> bool {
        ISSN_REGEX.is_match(input)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
