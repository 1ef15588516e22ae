//! Raw declarative entries — what the developer wrote, before validation.
//!
//! A [`SpecEntry`] is a positional sequence of [`EntryValue`]s mirroring the
//! declared tuple `(target, status, method, options?)`. Nothing here is
//! checked: entries can be too short, carry a boolean where the status code
//! belongs, or name options that do not exist. [`prepare_configuration`]
//! (crate::prepare_configuration) turns entries into validated
//! [`TestSpec`](crate::TestSpec)s and reports every problem it finds.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::spec::{ArgsFn, InitHook, ParamsFn};

/// Request payload / URL kwargs / credentials mapping.
pub type Params = serde_json::Map<String, Value>;

/// Free-form option map as declared. Keys are validated later, so a typo'd
/// key is representable here and rejected by the validator.
pub type OptionMap = BTreeMap<String, OptionValue>;

/// One positional element of a raw entry.
#[derive(Debug, Clone)]
pub enum EntryValue {
    /// A text value (route name, path, or HTTP method).
    Text(String),
    /// An integer (status code position).
    Int(i64),
    /// A boolean. Never valid in any position; representable so the
    /// validator can name it.
    Bool(bool),
    /// The options mapping (fourth position).
    Options(OptionMap),
    /// Anything else a config file can contain (null, float, nested list).
    Other(Value),
}

impl EntryValue {
    /// Human-readable type name for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Int(_) => "integer",
            Self::Bool(_) => "boolean",
            Self::Options(_) => "options mapping",
            Self::Other(v) => json_type_name(v),
        }
    }

    /// Short rendering of the value itself for diagnostics.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(s) => format!("\"{s}\""),
            Self::Int(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Options(map) => format!("{{{} option(s)}}", map.len()),
            Self::Other(v) => v.to_string(),
        }
    }
}

impl From<&str> for EntryValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for EntryValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for EntryValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for EntryValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// One raw option value, as declared.
///
/// The producer variants carry a *name* alongside the callable so generated
/// documentation can render `name()` where a literal would render its value.
#[derive(Clone)]
pub enum OptionValue {
    /// A text value (`comment`, `redirect_to`).
    Text(String),
    /// A literal mapping (`url_kwargs`, `request_data`, `user_credentials`).
    Params(Params),
    /// A literal positional sequence (`url_args`).
    Args(Vec<Value>),
    /// A named callable producing a mapping at run time.
    ParamsProducer {
        /// Identifying name, shown in documentation and diagnostics.
        name: String,
        /// The callable, invoked with the running test context.
        f: ParamsFn,
    },
    /// A named callable producing a positional sequence at run time.
    ArgsProducer {
        /// Identifying name, shown in diagnostics.
        name: String,
        /// The callable, invoked with the running test context.
        f: ArgsFn,
    },
    /// A setup hook (`initialize`), invoked before the request.
    Init(InitHook),
    /// Anything else a config file can contain.
    Other(Value),
}

impl OptionValue {
    /// A literal mapping built from a JSON object value.
    ///
    /// Non-object values come through as [`OptionValue::Other`] so the
    /// validator can report them.
    #[must_use]
    pub fn params(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Params(map),
            other => Self::Other(other),
        }
    }

    /// A named callable producing a mapping at run time.
    pub fn producer(
        name: impl Into<String>,
        f: impl Fn(&mut crate::TestContext<'_>) -> Params + Send + Sync + 'static,
    ) -> Self {
        Self::ParamsProducer {
            name: name.into(),
            f: std::sync::Arc::new(f),
        }
    }

    /// A named callable producing positional URL arguments at run time.
    pub fn args_producer(
        name: impl Into<String>,
        f: impl Fn(&mut crate::TestContext<'_>) -> Vec<Value> + Send + Sync + 'static,
    ) -> Self {
        Self::ArgsProducer {
            name: name.into(),
            f: std::sync::Arc::new(f),
        }
    }

    /// A setup hook, invoked with the test context before the request.
    pub fn init(
        name: impl Into<String>,
        f: impl Fn(&mut crate::TestContext<'_>) + Send + Sync + 'static,
    ) -> Self {
        Self::Init(InitHook::new(name, f))
    }

    /// Human-readable type name for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Params(_) => "mapping",
            Self::Args(_) => "sequence",
            Self::ParamsProducer { .. } | Self::ArgsProducer { .. } => "producer",
            Self::Init(_) => "init hook",
            Self::Other(v) => json_type_name(v),
        }
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Params(map) => f.debug_tuple("Params").field(map).finish(),
            Self::Args(items) => f.debug_tuple("Args").field(items).finish(),
            Self::ParamsProducer { name, .. } => write!(f, "ParamsProducer({name})"),
            Self::ArgsProducer { name, .. } => write!(f, "ArgsProducer({name})"),
            Self::Init(hook) => write!(f, "Init({})", hook.name()),
            Self::Other(v) => f.debug_tuple("Other").field(v).finish(),
        }
    }
}

/// One raw declarative entry: `(target, status, method)` or
/// `(target, status, method, options)`.
///
/// # Example
///
/// ```
/// use smoke::{OptionValue, SpecEntry};
///
/// let entry = SpecEntry::new("articles:create", 302, "POST")
///     .with("comment", OptionValue::Text("anonymous create redirects".into()));
/// assert_eq!(entry.parts().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct SpecEntry {
    parts: Vec<EntryValue>,
}

impl SpecEntry {
    /// A well-formed three-element entry with no options.
    pub fn new(target: impl Into<String>, status: i64, method: impl Into<String>) -> Self {
        Self {
            parts: vec![
                EntryValue::Text(target.into()),
                EntryValue::Int(status),
                EntryValue::Text(method.into()),
            ],
        }
    }

    /// Add (or overwrite) one option, creating the options mapping if the
    /// entry does not carry one yet. Keys are free-form here; unrecognized
    /// keys are a validation error, not a silent no-op.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: OptionValue) -> Self {
        if !matches!(self.parts.last(), Some(EntryValue::Options(_))) {
            self.parts.push(EntryValue::Options(OptionMap::new()));
        }
        if let Some(EntryValue::Options(map)) = self.parts.last_mut() {
            map.insert(key.into(), value);
        }
        self
    }

    /// Build an entry from raw positional parts. This is the escape hatch
    /// for deliberately malformed input (wrong arity, wrong element types)
    /// and for config-file loading.
    #[must_use]
    pub fn from_parts(parts: Vec<EntryValue>) -> Self {
        Self { parts }
    }

    /// The positional elements as declared.
    #[must_use]
    pub fn parts(&self) -> &[EntryValue] {
        &self.parts
    }
}

/// Type name of a raw JSON value, for diagnostics.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "text",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
