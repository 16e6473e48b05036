use std::cmp::Ordering;

use crate::formats::ParseOutcome;
use crate::models::Entry;

/// Renders entries back to BibTeX.
///
/// Entries are ordered by the `order_by` fields (missing fields sort as
/// empty strings, ties keep input order). Inside an entry the
/// `display_order` fields come first and the rest follow alphabetically.
#[derive(Debug, Clone)]
pub struct BibWriter {
    pub indent: String,
    pub order_by: Vec<String>,
    pub display_order: Vec<String>,
    pub align_values: bool,
}

impl Default for BibWriter {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            order_by: ["author", "year", "title"].map(String::from).to_vec(),
            display_order: ["author", "title", "booktitle", "journal"]
                .map(String::from)
                .to_vec(),
            align_values: true,
        }
    }
}

impl BibWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_align_values(mut self, align: bool) -> Self {
        self.align_values = align;
        self
    }

    pub fn write(&self, entries: &[Entry]) -> String {
        let mut sorted: Vec<&Entry> = entries.iter().collect();
        sorted.sort_by(|a, b| self.compare(a, b));

        sorted
            .into_iter()
            .map(|entry| self.write_entry(entry))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders a whole database: preambles in input order, string macros
    /// sorted by name, then the sorted entries.
    pub fn write_database(&self, database: &ParseOutcome) -> String {
        let mut blocks: Vec<String> = database
            .preambles
            .iter()
            .map(|text| format!("@preamble{{{{{}}}}}\n", text))
            .collect();

        let mut names: Vec<&String> = database.strings.keys().collect();
        names.sort();
        blocks.extend(
            names
                .into_iter()
                .map(|name| format!("@string{{{} = {{{}}}}}\n", name, database.strings[name])),
        );

        if !database.entries.is_empty() {
            blocks.push(self.write(&database.entries));
        }
        blocks.join("\n")
    }

    fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
        for field in &self.order_by {
            let ordering = a
                .get(field)
                .unwrap_or_default()
                .cmp(b.get(field).unwrap_or_default());
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Field names of `entry` in display order.
    pub fn field_order<'a>(&self, entry: &'a Entry) -> Vec<&'a str> {
        let mut ordered: Vec<&str> = self
            .display_order
            .iter()
            .filter_map(|field| entry.fields.get_key_value(field.as_str()))
            .map(|(key, _)| key.as_str())
            .collect();
        ordered.extend(
            entry
                .fields
                .keys()
                .map(String::as_str)
                .filter(|key| !self.display_order.iter().any(|d| d == key)),
        );
        ordered
    }

    pub fn write_entry(&self, entry: &Entry) -> String {
        let fields = self.field_order(entry);
        let width = if self.align_values {
            fields.iter().map(|f| f.len()).max().unwrap_or(0)
        } else {
            0
        };

        let mut bib = format!("@{}{{{},\n", entry.entry_type, entry.id);
        let lines: Vec<String> = fields
            .iter()
            .map(|field| {
                let value = entry.get(field).unwrap_or_default();
                format!("{}{:<width$} = {{{}}}", self.indent, field, value)
            })
            .collect();
        bib.push_str(&lines.join(",\n"));
        if !lines.is_empty() {
            bib.push('\n');
        }
        bib.push_str("}\n");
        bib
    }
}
