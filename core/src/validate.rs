//! Configuration validation and normalization.
//!
//! [`prepare_configuration`] checks "whatever the developer wrote" against
//! the declared shape — arity, element types, the fixed method set, the
//! recognized option keys — and either returns normalized
//! [`TestSpec`](crate::TestSpec)s or one [`ConfigError`] carrying **every**
//! violation found. Validation never fails fast and never partially
//! succeeds: a single bad entry invalidates the whole configuration.

use std::fmt;

use crate::entry::{EntryValue, OptionMap, OptionValue, SpecEntry};
use crate::spec::{HttpMethod, Options, TestSpec, ValueSource};
use crate::MAX_SPECS;

/// The recognized option keys, sorted for deterministic diagnostics.
pub const RECOGNIZED_OPTIONS: [&str; 7] = [
    "comment",
    "initialize",
    "redirect_to",
    "request_data",
    "url_args",
    "url_kwargs",
    "user_credentials",
];

/// Which positional field of an entry a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecField {
    /// Element 0: route name or literal path.
    Target,
    /// Element 1: expected status code.
    Status,
    /// Element 2: HTTP method.
    Method,
    /// Element 3: options mapping.
    Options,
}

impl SpecField {
    fn as_str(self) -> &'static str {
        match self {
            Self::Target => "target",
            Self::Status => "status",
            Self::Method => "method",
            Self::Options => "options",
        }
    }
}

impl fmt::Display for SpecField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structural or type problem in a declared configuration.
///
/// Violations are an enum so tests match on kind rather than message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The configuration declares no specifications at all.
    EmptyConfiguration,
    /// The configuration root is not a sequence of specifications.
    WrongConfigurationType {
        /// Type name of what was found instead.
        found: &'static str,
    },
    /// More specifications than [`MAX_SPECS`].
    TooManySpecs {
        /// Actual count of specifications.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// An entry with other than 3 or 4 elements.
    MalformedSpec {
        /// Index of the offending entry.
        index: usize,
        /// Actual element count.
        len: usize,
    },
    /// A positional element of the wrong type.
    WrongFieldType {
        /// Index of the offending entry.
        index: usize,
        /// Which positional field.
        field: SpecField,
        /// Expected type description.
        expected: &'static str,
        /// Type name of what was found.
        found: &'static str,
        /// Rendering of the offending value.
        value: String,
    },
    /// A target that is present but empty.
    EmptyTarget {
        /// Index of the offending entry.
        index: usize,
    },
    /// A method name outside the fixed enumeration.
    UnknownMethod {
        /// Index of the offending entry.
        index: usize,
        /// The declared method name.
        value: String,
    },
    /// An option key outside the recognized set.
    UnsupportedOption {
        /// Index of the offending entry.
        index: usize,
        /// The unrecognized key.
        key: String,
    },
    /// A recognized option key with a value of the wrong shape.
    WrongOptionType {
        /// Index of the offending entry.
        index: usize,
        /// The option key.
        key: String,
        /// Expected shape description.
        expected: &'static str,
        /// Type name of what was found.
        found: &'static str,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyConfiguration => {
                write!(f, "empty configuration — declare at least one specification")
            }
            Self::WrongConfigurationType { found } => {
                write!(
                    f,
                    "wrong configuration type — expected a sequence of specifications, found {found}"
                )
            }
            Self::TooManySpecs { count, max } => {
                write!(
                    f,
                    "configuration has {count} specifications, but maximum allowed is {max}"
                )
            }
            Self::MalformedSpec { index, len } => {
                write!(
                    f,
                    "spec #{index}: malformed specification — expected 3 or 4 elements, found {len}"
                )
            }
            Self::WrongFieldType {
                index,
                field,
                expected,
                found,
                value,
            } => {
                write!(
                    f,
                    "spec #{index}: {field} must be {expected}, found {found} ({value})"
                )
            }
            Self::EmptyTarget { index } => {
                write!(
                    f,
                    "spec #{index}: target must be a non-empty route name or path"
                )
            }
            Self::UnknownMethod { index, value } => {
                write!(
                    f,
                    "spec #{index}: unsupported HTTP method \"{value}\" — supported: {}",
                    method_list()
                )
            }
            Self::UnsupportedOption { index, key } => {
                write!(
                    f,
                    "spec #{index}: unsupported option \"{key}\" — recognized: {}",
                    RECOGNIZED_OPTIONS.join(", ")
                )
            }
            Self::WrongOptionType {
                index,
                key,
                expected,
                found,
            } => {
                write!(
                    f,
                    "spec #{index}: option \"{key}\" must be {expected}, found {found}"
                )
            }
        }
    }
}

fn method_list() -> String {
    HttpMethod::ALL
        .iter()
        .map(HttpMethod::lower)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A configuration that failed validation: every violation found, combined.
///
/// Rendered as one multi-line message with a trailing documentation
/// pointer. The suite builder converts this into a single always-failing
/// diagnostic procedure so test discovery never aborts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    violations: Vec<Violation>,
}

impl ConfigError {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub(crate) fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// Every violation found, in declaration order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "test configuration is invalid:")?;
        for violation in &self.violations {
            writeln!(f, "  - {violation}")?;
        }
        write!(
            f,
            "see https://docs.rs/smoke-core for the configuration format"
        )
    }
}

impl std::error::Error for ConfigError {}

/// Validate and normalize a declared configuration.
///
/// Length-3 entries get an empty options mapping. All violations across
/// all entries accumulate into one error; output is all-or-nothing.
///
/// # Errors
///
/// Returns [`ConfigError`] carrying every [`Violation`] found.
pub fn prepare_configuration(entries: &[SpecEntry]) -> Result<Vec<TestSpec>, ConfigError> {
    if entries.is_empty() {
        return Err(ConfigError::single(Violation::EmptyConfiguration));
    }
    if entries.len() > MAX_SPECS {
        return Err(ConfigError::single(Violation::TooManySpecs {
            count: entries.len(),
            max: MAX_SPECS,
        }));
    }

    let mut violations = Vec::new();
    let mut specs = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match check_entry(index, entry) {
            Ok(spec) => specs.push(spec),
            Err(mut found) => violations.append(&mut found),
        }
    }

    if violations.is_empty() {
        Ok(specs)
    } else {
        Err(ConfigError::new(violations))
    }
}

fn check_entry(index: usize, entry: &SpecEntry) -> Result<TestSpec, Vec<Violation>> {
    let parts = entry.parts();
    if parts.len() != 3 && parts.len() != 4 {
        // A malformed entry's elements are positionally meaningless;
        // don't second-guess which element was meant to be which.
        return Err(vec![Violation::MalformedSpec {
            index,
            len: parts.len(),
        }]);
    }

    let mut violations = Vec::new();

    let target = match &parts[0] {
        EntryValue::Text(s) if !s.is_empty() => Some(s.clone()),
        EntryValue::Text(_) => {
            violations.push(Violation::EmptyTarget { index });
            None
        }
        other => {
            violations.push(Violation::WrongFieldType {
                index,
                field: SpecField::Target,
                expected: "a non-empty route name or path",
                found: other.type_name(),
                value: other.render(),
            });
            None
        }
    };

    let status = match &parts[1] {
        EntryValue::Int(n) => match u16::try_from(*n) {
            Ok(code) => Some(code),
            Err(_) => {
                violations.push(Violation::WrongFieldType {
                    index,
                    field: SpecField::Status,
                    expected: "an integer status code",
                    found: "integer",
                    value: n.to_string(),
                });
                None
            }
        },
        other => {
            violations.push(Violation::WrongFieldType {
                index,
                field: SpecField::Status,
                expected: "an integer status code",
                found: other.type_name(),
                value: other.render(),
            });
            None
        }
    };

    let method = match &parts[2] {
        EntryValue::Text(s) => match HttpMethod::parse(s) {
            Some(method) => Some(method),
            None => {
                violations.push(Violation::UnknownMethod {
                    index,
                    value: s.clone(),
                });
                None
            }
        },
        other => {
            violations.push(Violation::WrongFieldType {
                index,
                field: SpecField::Method,
                expected: "an HTTP method name",
                found: other.type_name(),
                value: other.render(),
            });
            None
        }
    };

    let options = if parts.len() == 4 {
        match &parts[3] {
            EntryValue::Options(map) => Some(check_options(index, map, &mut violations)),
            other => {
                violations.push(Violation::WrongFieldType {
                    index,
                    field: SpecField::Options,
                    expected: "an options mapping",
                    found: other.type_name(),
                    value: other.render(),
                });
                None
            }
        }
    } else {
        Some(Options::default())
    };

    match (target, status, method, options) {
        (Some(target), Some(status), Some(method), Some(options)) if violations.is_empty() => {
            Ok(TestSpec {
                target,
                status,
                method,
                options,
            })
        }
        _ => Err(violations),
    }
}

fn check_options(index: usize, map: &OptionMap, violations: &mut Vec<Violation>) -> Options {
    let mut options = Options::default();

    for (key, value) in map {
        match key.as_str() {
            "comment" => match value {
                OptionValue::Text(s) => options.comment = Some(s.clone()),
                other => violations.push(wrong_option(index, key, "text", other)),
            },
            "redirect_to" => match value {
                OptionValue::Text(s) => options.redirect_to = Some(s.clone()),
                other => violations.push(wrong_option(index, key, "text", other)),
            },
            "initialize" => match value {
                OptionValue::Init(hook) => options.initialize = Some(hook.clone()),
                other => violations.push(wrong_option(index, key, "an init hook", other)),
            },
            "url_kwargs" => options.url_kwargs = params_source(index, key, value, violations),
            "request_data" => options.request_data = params_source(index, key, value, violations),
            "user_credentials" => {
                options.user_credentials = params_source(index, key, value, violations);
            }
            "url_args" => match value {
                OptionValue::Args(items) => {
                    options.url_args = Some(ValueSource::Literal(items.clone()));
                }
                OptionValue::ArgsProducer { name, f } => {
                    options.url_args = Some(ValueSource::Producer {
                        name: name.clone(),
                        f: f.clone(),
                    });
                }
                other => {
                    violations.push(wrong_option(index, key, "a sequence or a producer", other));
                }
            },
            _ => violations.push(Violation::UnsupportedOption {
                index,
                key: key.clone(),
            }),
        }
    }

    options
}

fn params_source(
    index: usize,
    key: &str,
    value: &OptionValue,
    violations: &mut Vec<Violation>,
) -> Option<ValueSource<crate::Params>> {
    match value {
        OptionValue::Params(map) => Some(ValueSource::Literal(map.clone())),
        OptionValue::ParamsProducer { name, f } => Some(ValueSource::Producer {
            name: name.clone(),
            f: f.clone(),
        }),
        other => {
            violations.push(wrong_option(index, key, "a mapping or a producer", other));
            None
        }
    }
}

fn wrong_option(index: usize, key: &str, expected: &'static str, found: &OptionValue) -> Violation {
    Violation::WrongOptionType {
        index,
        key: key.to_owned(),
        expected,
        found: found.type_name(),
    }
}
