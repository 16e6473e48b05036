use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("invalid DOI: {0}")]
    InvalidDoi(String),

    #[error("invalid ISBN: {0}")]
    InvalidIsbn(String),

    #[error("invalid ISSN: {0}")]
    InvalidIssn(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {0}: {1}")]
    ApiError(String, String),

    #[error("rate limit from {0}, retry after {1}s")]
    RateLimit(String, u64),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] prettybib_core::CoreError),
}

pub type Result<T> = std::result::Result<T, CheckError>;
