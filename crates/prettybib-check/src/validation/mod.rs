//! The validation and repair engine.

pub mod address;
pub mod checker;
pub mod context;
pub mod countries;
pub mod dispatch;
pub mod fields;
pub mod log;
pub mod presence;

pub use address::{AddressCheck, check_address};
pub use checker::{DatabaseChecker, FieldIndexes, check_database};
pub use context::{CheckContext, IssnCache};
pub use dispatch::{check_entry, required_fields};
pub use fields::FieldValidator;
pub use log::{CheckLog, Diagnostic, DiagnosticKind, Severity};
pub use presence::check_field;
