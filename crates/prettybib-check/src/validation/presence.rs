use prettybib_core::{Entry, SENTINEL};

use crate::validation::context::CheckContext;
use crate::validation::fields::FieldValidator;
use crate::validation::log::DiagnosticKind;

/// Makes sure `field` is present and valid.
///
/// A missing or sentinel field is copied from the citation database when
/// `try_find` is set and the trusted record has it; otherwise it becomes the
/// sentinel. The field's validator, if any, then always runs. Fields without
/// a validator are accepted when they hold real content.
pub async fn check_field(
    ctx: &mut CheckContext<'_>,
    entry: &mut Entry,
    field: &str,
    try_fix: bool,
    try_find: bool,
) -> bool {
    if entry.is_missing(field) {
        let copied = try_find && copy_from_citations(ctx, entry, field);
        if !copied {
            entry.set(field, SENTINEL);
            ctx.log.error(
                entry,
                DiagnosticKind::MissingField,
                Some(field),
                format!("missing field '{field}'."),
            );
        }
    }

    match FieldValidator::for_field(field) {
        Some(validator) => validator.validate(ctx, entry, try_fix).await,
        None => !entry.is_missing(field),
    }
}

fn copy_from_citations(ctx: &mut CheckContext<'_>, entry: &mut Entry, field: &str) -> bool {
    let Some(value) = ctx
        .citations
        .lookup_entry(entry)
        .and_then(|trusted| trusted.value(field))
        .map(str::to_string)
    else {
        return false;
    };
    entry.set(field, value.as_str());
    ctx.log.info(
        entry,
        Some(field),
        format!("field '{field}' copied from the citation database as '{value}'."),
    );
    true
}
