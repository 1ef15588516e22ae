//! Generated test documentation strings.
//!
//! `<METHOD> <target> <status> "<status text>" <payload>[ <comment>]` — one
//! line a developer can read in a test report without opening the
//! configuration. Deterministic for a given configuration, unlike names.

use crate::spec::{TestSpec, ValueSource};

/// Human-readable phrase for a status code, `"UNKNOWN"` for codes outside
/// the registered set.
#[must_use]
pub fn status_text(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("UNKNOWN")
}

/// Build the documentation string for one validated specification.
///
/// The payload renders as compact JSON for literals and `name()` for
/// producers (whose value is unknown until invoked); an absent payload
/// renders as the empty mapping that will be sent.
#[must_use]
pub fn prepare_test_doc(spec: &TestSpec) -> String {
    let payload = spec
        .options
        .request_data
        .as_ref()
        .map_or_else(|| "{}".to_owned(), ValueSource::label);

    let mut doc = format!(
        "{} {} {} \"{}\" {}",
        spec.method,
        spec.target,
        spec.status,
        status_text(spec.status),
        payload
    );
    if let Some(comment) = &spec.options.comment {
        doc.push(' ');
        doc.push_str(comment);
    }
    doc
}
