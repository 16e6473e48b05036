pub mod citations;
pub mod config;
pub mod error;
pub mod formats;
pub mod models;
pub mod normalize;

pub use citations::CitationDatabase;
pub use config::AppConfig;
pub use error::{CoreError, Result};
pub use formats::{BibWriter, ParseOutcome, parse_bibtex};
pub use models::*;
pub use normalize::{collapse_whitespace, normalize_authors, normalize_booktitle, normalize_title};
