//! Checking and repair of bibliographic records: identifiers, lookups,
//! validation rules and near-duplicate detection.

pub mod dedup;
pub mod error;
pub mod http;
pub mod identifiers;
pub mod index;
pub mod sources;
pub mod validation;

pub use dedup::{CollisionGroup, FuzzyClusterer};
pub use error::{CheckError, Result};
pub use index::ValueIndex;
pub use sources::{LookupOutcome, Lookups};
pub use validation::{CheckContext, CheckLog, DatabaseChecker, FieldIndexes, IssnCache, check_database};
