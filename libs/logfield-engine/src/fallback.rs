use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use logfield_api::Subject;

/// Returned when a value has no usable text form at all.
pub const FAILED_TO_ENCODE: &str = "__failed_to_encode__";

/// Last-resort text for a value no handler recognizes. Never fails.
///
/// Tries the canonical (`Display`) form, then the representational (`Debug`)
/// form, then gives up with [`FAILED_TO_ENCODE`]. A missing capability, an
/// `Err` from the formatter, or a panic inside it all count as failure.
pub fn unknown_default(subject: &Subject<'_>) -> String {
    if let Some(text) = subject.as_display().and_then(|d| render(format_args!("{d}"))) {
        return text;
    }
    if let Some(text) = subject.as_debug().and_then(|d| render(format_args!("{d:?}"))) {
        return text;
    }
    FAILED_TO_ENCODE.to_string()
}

fn render(args: fmt::Arguments<'_>) -> Option<String> {
    catch_unwind(AssertUnwindSafe(|| {
        let mut out = String::new();
        fmt::write(&mut out, args).ok().map(|()| out)
    }))
    .ok()
    .flatten()
}
