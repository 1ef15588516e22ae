//! Config-file front door.
//!
//! Declarative suites can live in YAML or JSON files; callers parse the
//! file into a `serde_json::Value` and hand the root here. Callables are
//! not expressible in files, so file-declared options are literal-only —
//! producers and init hooks exist only in code-declared entries.
//!
//! Nothing is validated here beyond the root shape: conversion keeps the
//! declared structure intact (including mistakes) so
//! [`prepare_configuration`](crate::prepare_configuration) can report
//! every problem with indexes and type names.

use serde_json::Value;

use crate::entry::{EntryValue, OptionValue, SpecEntry};
use crate::runner::{build_suite, Suite};
use crate::validate::{ConfigError, Violation};

/// Convert a parsed suite file into raw entries.
///
/// # Errors
///
/// Returns [`Violation::WrongConfigurationType`] when the root is not a
/// sequence of specifications.
pub fn suite_entries(root: &Value) -> Result<Vec<SpecEntry>, ConfigError> {
    let list = root.as_array().ok_or_else(|| {
        ConfigError::single(Violation::WrongConfigurationType {
            found: crate::entry::json_type_name(root),
        })
    })?;
    Ok(list.iter().map(entry_from_value).collect())
}

/// Convert one raw value into a [`SpecEntry`], preserving mistakes for the
/// validator to report.
#[must_use]
pub fn entry_from_value(value: &Value) -> SpecEntry {
    match value {
        Value::Array(parts) => SpecEntry::from_parts(parts.iter().map(entry_value).collect()),
        // A non-sequence entry becomes a one-element entry; the validator
        // reports it as a malformed specification.
        other => SpecEntry::from_parts(vec![entry_value(other)]),
    }
}

/// Build the suite for a parsed suite file, substituting the diagnostic
/// procedure when the root shape is already wrong.
#[must_use]
pub fn suite_from_value(root: &Value) -> Suite {
    match suite_entries(root) {
        Ok(entries) => build_suite(&entries),
        Err(error) => Suite::diagnostic(error),
    }
}

fn entry_value(value: &Value) -> EntryValue {
    match value {
        Value::String(s) => EntryValue::Text(s.clone()),
        Value::Number(n) => n
            .as_i64()
            .map_or_else(|| EntryValue::Other(value.clone()), EntryValue::Int),
        Value::Bool(b) => EntryValue::Bool(*b),
        Value::Object(map) => EntryValue::Options(
            map.iter()
                .map(|(key, value)| (key.clone(), option_value(value)))
                .collect(),
        ),
        other => EntryValue::Other(other.clone()),
    }
}

fn option_value(value: &Value) -> OptionValue {
    match value {
        Value::String(s) => OptionValue::Text(s.clone()),
        Value::Object(map) => OptionValue::Params(map.clone()),
        Value::Array(items) => OptionValue::Args(items.clone()),
        other => OptionValue::Other(other.clone()),
    }
}
