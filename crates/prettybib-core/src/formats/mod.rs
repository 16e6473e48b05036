pub mod parser;
pub mod writer;

pub use parser::{ParseOutcome, SkippedRecord, parse_bibtex, parse_bibtex_strict};
pub use writer::BibWriter;
