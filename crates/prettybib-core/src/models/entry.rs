use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker for a field that is known to be missing and needs a human.
pub const SENTINEL: &str = "TODO";

/// Entry kinds the checker knows how to validate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Article,
    Book,
    InProceedings,
    TechReport,
    Other(String),
}

impl EntryKind {
    pub fn from_type(entry_type: &str) -> Self {
        match entry_type.to_ascii_lowercase().as_str() {
            "article" => Self::Article,
            "book" => Self::Book,
            "inproceedings" => Self::InProceedings,
            "techreport" => Self::TechReport,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::InProceedings => "inproceedings",
            Self::TechReport => "techreport",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field names are case-insensitive and stored lower-cased.
fn field_key(field: &str) -> Cow<'_, str> {
    if field.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(field.to_ascii_lowercase())
    } else {
        Cow::Borrowed(field)
    }
}

/// One bibliographic record.
///
/// `id` and `entry_type` correspond to the reserved `ID` and `ENTRYTYPE`
/// keys; every other field lives in `fields` under its lower-cased name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub entry_type: String,
    pub fields: BTreeMap<String, String>,
}

impl Entry {
    pub fn new(id: impl Into<String>, entry_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entry_type: entry_type.into().to_ascii_lowercase(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter, handy when assembling records by hand.
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn kind(&self) -> EntryKind {
        EntryKind::from_type(&self.entry_type)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(&*field_key(field)).map(String::as_str)
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field_key(field).into_owned(), value.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(&*field_key(field))
    }

    /// Value of `field` unless it is absent or the sentinel.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.get(field).filter(|v| *v != SENTINEL)
    }

    pub fn is_missing(&self, field: &str) -> bool {
        self.value(field).is_none()
    }

    pub fn title(&self) -> Option<&str> {
        self.value("title")
    }

    /// Replace every field and the entry type with those of `other`, keeping
    /// this record's id.
    pub fn replace_with(&mut self, other: &Entry) {
        self.entry_type = other.entry_type.clone();
        self.fields = other.fields.clone();
    }
}
