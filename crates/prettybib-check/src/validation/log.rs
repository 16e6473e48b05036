use std::fmt;

use prettybib_core::Entry;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    MissingField,
    MalformedField,
    DuplicateTitle,
    LookupFailed,
    Fixed,
}

/// One line of the check log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub entry_id: String,
    pub entry_type: String,
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub field: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.entry_id, self.entry_type, self.message)
    }
}

/// Diagnostics of a checking run in emission order, plus the exact-duplicate
/// title groups found along the way.
#[derive(Debug, Clone, Default)]
pub struct CheckLog {
    diagnostics: Vec<Diagnostic>,
    duplicate_titles: Vec<Vec<String>>,
}

impl CheckLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, entry: &Entry, field: Option<&str>, message: impl Into<String>) {
        self.push(entry, Severity::Info, DiagnosticKind::Fixed, field, message.into());
    }

    pub fn error(
        &mut self,
        entry: &Entry,
        kind: DiagnosticKind,
        field: Option<&str>,
        message: impl Into<String>,
    ) {
        self.push(entry, Severity::Error, kind, field, message.into());
    }

    fn push(
        &mut self,
        entry: &Entry,
        severity: Severity,
        kind: DiagnosticKind,
        field: Option<&str>,
        message: String,
    ) {
        let diagnostic = Diagnostic {
            entry_id: entry.id.clone(),
            entry_type: entry.entry_type.clone(),
            severity,
            kind,
            field: field.map(str::to_string),
            message,
        };
        debug!(?severity, ?kind, "{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn for_entry<'a>(&'a self, entry_id: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.entry_id == entry_id)
    }

    pub fn has(&self, entry_id: &str, kind: DiagnosticKind, field: &str) -> bool {
        self.for_entry(entry_id)
            .any(|d| d.kind == kind && d.field.as_deref() == Some(field))
    }

    pub fn record_duplicate_titles(&mut self, ids: Vec<String>) {
        self.duplicate_titles.push(ids);
    }

    /// Record ids sharing a normalized title, groups in discovery order.
    pub fn duplicate_titles(&self) -> &[Vec<String>] {
        &self.duplicate_titles
    }
}
