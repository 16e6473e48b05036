pub mod doi;
pub mod isbn;
pub mod issn;

pub use doi::Doi;
pub use isbn::{Isbn, IsbnKind};
pub use issn::Issn;
