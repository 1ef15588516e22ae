//! Validated specifications and the callable-or-literal seam.
//!
//! # Naming: entry vs spec
//!
//! - [`SpecEntry`](crate::SpecEntry) = raw declaration (what the developer wrote)
//! - [`TestSpec`] = validated, normalized form (what the synthesizer runs)
//!
//! The split keeps validation honest: a `TestSpec` cannot exist with an
//! unknown method or a mistyped option, so downstream code never re-checks.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::entry::Params;
use crate::harness::TestContext;

/// Callable producing a mapping from the running test context.
pub type ParamsFn = Arc<dyn Fn(&mut TestContext<'_>) -> Params + Send + Sync>;

/// Callable producing positional URL arguments from the running test context.
pub type ArgsFn = Arc<dyn Fn(&mut TestContext<'_>) -> Vec<Value> + Send + Sync>;

/// Setup callable invoked with the running test context.
pub type InitFn = Arc<dyn Fn(&mut TestContext<'_>) + Send + Sync>;

/// The fixed HTTP method enumeration.
///
/// Method names in declarations are matched case-insensitively against this
/// set; anything else is a configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Head,
    Options,
    Put,
    Patch,
    Delete,
    Trace,
}

impl HttpMethod {
    /// Every supported method, in declaration-friendly order.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Trace,
    ];

    /// Case-insensitive parse against the fixed set.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "head" => Some(Self::Head),
            "options" => Some(Self::Options),
            "put" => Some(Self::Put),
            "patch" => Some(Self::Patch),
            "delete" => Some(Self::Delete),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Uppercase rendering (documentation strings).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Trace => "TRACE",
        }
    }

    /// Lowercase rendering (generated test names).
    #[must_use]
    pub fn lower(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Head => "head",
            Self::Options => "options",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that is either declared literally or produced at run time.
///
/// Producers are invoked with the running [`TestContext`], so a value
/// created during `initialize` (for example a seeded user) can be read back
/// when credentials or URL arguments are needed — within the same procedure
/// only.
#[derive(Clone)]
pub enum ValueSource<T> {
    /// The value as declared.
    Literal(T),
    /// A named callable producing the value at run time.
    Producer {
        /// Identifying name, shown in documentation strings.
        name: String,
        /// The callable, invoked with the running test context.
        f: Arc<dyn Fn(&mut TestContext<'_>) -> T + Send + Sync>,
    },
}

impl<T: Clone> ValueSource<T> {
    /// Resolve to a concrete value, invoking the producer if present.
    pub fn resolve(&self, ctx: &mut TestContext<'_>) -> T {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Producer { f, .. } => f(ctx),
        }
    }
}

impl<T> ValueSource<T> {
    /// A named producer.
    pub fn producer(
        name: impl Into<String>,
        f: impl Fn(&mut TestContext<'_>) -> T + Send + Sync + 'static,
    ) -> Self {
        Self::Producer {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// `true` when the value is produced at run time.
    #[must_use]
    pub fn is_producer(&self) -> bool {
        matches!(self, Self::Producer { .. })
    }
}

impl ValueSource<Params> {
    /// Rendering for documentation strings: the literal as compact JSON, or
    /// `name()` for a producer whose value is unknown until invoked.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Literal(params) => Value::Object(params.clone()).to_string(),
            Self::Producer { name, .. } => format!("{name}()"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Producer { name, .. } => write!(f, "Producer({name})"),
        }
    }
}

/// A named setup hook, invoked with the test context before the request.
#[derive(Clone)]
pub struct InitHook {
    name: String,
    f: InitFn,
}

impl InitHook {
    /// Create a named hook.
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&mut TestContext<'_>) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// The hook's identifying name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the hook.
    pub fn call(&self, ctx: &mut TestContext<'_>) {
        (self.f)(ctx);
    }
}

impl fmt::Debug for InitHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InitHook({})", self.name)
    }
}

/// Resolved URL arguments handed to the router: positional and keyword,
/// both possibly empty.
#[derive(Debug, Clone, Default)]
pub struct UrlArgs {
    /// Positional arguments, consumed in order.
    pub args: Vec<Value>,
    /// Keyword arguments, matched by placeholder name.
    pub kwargs: Params,
}

impl UrlArgs {
    /// `true` when no arguments were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }
}

/// Validated options of one specification. Every field is typed; the raw
/// option map this came from has already been checked against the
/// recognized-key table.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Appended to the generated documentation string.
    pub comment: Option<String>,
    /// Setup hook, invoked before anything else.
    pub initialize: Option<InitHook>,
    /// Keyword arguments for URL resolution.
    pub url_kwargs: Option<ValueSource<Params>>,
    /// Positional arguments for URL resolution.
    pub url_args: Option<ValueSource<Vec<Value>>>,
    /// Request payload.
    pub request_data: Option<ValueSource<Params>>,
    /// Credentials for the auth collaborator; login must succeed.
    pub user_credentials: Option<ValueSource<Params>>,
    /// Exact redirect target asserted when the expected status is a
    /// redirect code.
    pub redirect_to: Option<String>,
}

/// One validated smoke-test specification.
#[derive(Debug, Clone)]
pub struct TestSpec {
    /// Route name (plain or namespaced) or literal path.
    pub target: String,
    /// HTTP status code to assert.
    pub status: u16,
    /// HTTP method to dispatch.
    pub method: HttpMethod,
    /// Validated options.
    pub options: Options,
}
