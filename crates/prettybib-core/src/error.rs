use thiserror::Error;

/// All errors that can occur in prettybib-core.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("BibTeX syntax error at line {line}: {message}")]
    Syntax { line: u32, message: String },

    #[error("Anthology not found: {0}")]
    AnthologyNotFound(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Exit codes used by the `prettybib` binary.
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidInput = 2,
}

pub type Result<T> = std::result::Result<T, CoreError>;
