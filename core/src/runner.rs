//! Procedure synthesis and suite building.
//!
//! [`generate_test`] turns one validated [`TestSpec`] into a runnable,
//! documented procedure. [`build_suite`] does it for a whole declared
//! configuration — or, when validation fails, substitutes exactly one
//! always-failing diagnostic procedure so a runner reports *a* failing
//! test instead of silently generating nothing.
//!
//! # Execution order (per procedure)
//!
//! 1. `initialize` hook
//! 2. resolve URL arguments, then the target path
//! 3. `user_credentials` → login (rejection is fatal)
//! 4. resolve `request_data` (default empty)
//! 5. dispatch the call
//! 6. assert status
//! 7. assert redirect target, when expected status is a redirect code
//!
//! No step retries. A procedure either passes deterministically or fails
//! with a precise diagnostic.

use std::collections::HashSet;
use std::fmt;

use serde_json::Value;

use crate::doc::{prepare_test_doc, status_text};
use crate::entry::{Params, SpecEntry};
use crate::harness::{CollabError, Harness, TestContext};
use crate::name::prepare_test_name;
use crate::spec::{TestSpec, UrlArgs};
use crate::validate::{prepare_configuration, ConfigError};
use crate::{DIAGNOSTIC_TEST_NAME, REDIRECT_STATUSES};

/// A runnable procedure bound to a test context at execution time.
pub type TestFn = Box<dyn Fn(&mut TestContext<'_>) -> Result<(), TestFailure> + Send + Sync>;

/// Why a generated procedure failed.
#[derive(Debug)]
pub enum TestFailure {
    /// The whole configuration was invalid; carries every violation.
    Configuration(ConfigError),
    /// The auth collaborator rejected the credentials.
    LoginRejected {
        /// The rejected credentials, named in the failure message.
        credentials: Params,
    },
    /// The response status did not match the expectation.
    StatusMismatch {
        /// Declared expected status.
        expected: u16,
        /// Status the collaborator returned.
        actual: u16,
    },
    /// The response did not redirect to the expected location.
    RedirectMismatch {
        /// Declared redirect target.
        expected: String,
        /// Redirect target the collaborator returned, if any.
        actual: Option<String>,
    },
    /// A collaborator itself failed; the original error is the source.
    Collaborator(CollabError),
}

impl fmt::Display for TestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(error) => write!(f, "{error}"),
            Self::LoginRejected { credentials } => {
                write!(
                    f,
                    "login was rejected for credentials {}",
                    Value::Object(credentials.clone())
                )
            }
            Self::StatusMismatch { expected, actual } => {
                write!(
                    f,
                    "expected status {expected} \"{}\", got {actual} \"{}\"",
                    status_text(*expected),
                    status_text(*actual)
                )
            }
            Self::RedirectMismatch { expected, actual } => match actual {
                Some(actual) => {
                    write!(f, "expected redirect to \"{expected}\", got \"{actual}\"")
                }
                None => write!(f, "expected redirect to \"{expected}\", got no redirect"),
            },
            Self::Collaborator(error) => write!(f, "collaborator error: {error}"),
        }
    }
}

impl std::error::Error for TestFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Collaborator(error) => Some(error.as_ref()),
            Self::Configuration(error) => Some(error),
            _ => None,
        }
    }
}

impl From<CollabError> for TestFailure {
    fn from(error: CollabError) -> Self {
        Self::Collaborator(error)
    }
}

/// A generated procedure with its derived name and documentation.
///
/// Created once at suite-build time, never mutated, invoked any number of
/// times — each run against a fresh [`TestContext`].
pub struct GeneratedTest {
    name: String,
    doc: String,
    run: TestFn,
}

impl GeneratedTest {
    /// The unique derived name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The human-readable summary.
    #[must_use]
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Run the procedure against a context.
    ///
    /// # Errors
    ///
    /// Returns the [`TestFailure`] describing the first assertion or
    /// collaborator problem; there are no retries.
    pub fn execute(&self, ctx: &mut TestContext<'_>) -> Result<(), TestFailure> {
        (self.run)(ctx)
    }
}

impl fmt::Debug for GeneratedTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedTest")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .finish()
    }
}

/// Synthesize the procedure for one validated specification.
#[must_use]
pub fn generate_test(spec: TestSpec) -> GeneratedTest {
    let name = prepare_test_name(&spec.target, spec.method, spec.status);
    let doc = prepare_test_doc(&spec);
    let run: TestFn = Box::new(move |ctx| run_spec(&spec, ctx));
    GeneratedTest { name, doc, run }
}

/// Synthesize the single always-failing stand-in for an invalid
/// configuration. Fixed name: [`DIAGNOSTIC_TEST_NAME`].
#[must_use]
pub fn generate_diagnostic_test(error: ConfigError) -> GeneratedTest {
    GeneratedTest {
        name: DIAGNOSTIC_TEST_NAME.to_owned(),
        doc: "reports the configuration error for this suite".to_owned(),
        run: Box::new(move |_ctx| Err(TestFailure::Configuration(error.clone()))),
    }
}

fn run_spec(spec: &TestSpec, ctx: &mut TestContext<'_>) -> Result<(), TestFailure> {
    if let Some(init) = &spec.options.initialize {
        init.call(ctx);
    }

    let mut url_args = UrlArgs::default();
    if let Some(kwargs) = &spec.options.url_kwargs {
        url_args.kwargs = kwargs.resolve(ctx);
    }
    if let Some(args) = &spec.options.url_args {
        url_args.args = args.resolve(ctx);
    }
    let path = ctx.harness.resolve(&spec.target, &url_args)?;

    if let Some(credentials) = &spec.options.user_credentials {
        let credentials = credentials.resolve(ctx);
        if !ctx.harness.login(&credentials)? {
            return Err(TestFailure::LoginRejected { credentials });
        }
    }

    let data = spec
        .options
        .request_data
        .as_ref()
        .map_or_else(Params::new, |source| source.resolve(ctx));

    let response = ctx.harness.perform(spec.method, &path, &data)?;

    if response.status != spec.status {
        return Err(TestFailure::StatusMismatch {
            expected: spec.status,
            actual: response.status,
        });
    }

    if REDIRECT_STATUSES.contains(&spec.status) {
        if let Some(expected) = &spec.options.redirect_to {
            if response.redirect_to.as_deref() != Some(expected.as_str()) {
                return Err(TestFailure::RedirectMismatch {
                    expected: expected.clone(),
                    actual: response.redirect_to,
                });
            }
        }
    }

    Ok(())
}

/// Outcome of running one generated procedure.
#[derive(Debug)]
pub struct TestReport {
    /// The procedure's derived name.
    pub name: String,
    /// The procedure's documentation string.
    pub doc: String,
    /// Pass, or the failure.
    pub outcome: Result<(), TestFailure>,
}

impl TestReport {
    /// `true` when the procedure passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// The generated procedures for one declared configuration.
///
/// Either one procedure per specification, or — when validation failed —
/// exactly one diagnostic procedure. Never a mix.
#[derive(Debug)]
pub struct Suite {
    tests: Vec<GeneratedTest>,
    diagnostic: bool,
}

impl Suite {
    /// A suite consisting only of the diagnostic procedure for `error`.
    #[must_use]
    pub fn diagnostic(error: ConfigError) -> Self {
        Self {
            tests: vec![generate_diagnostic_test(error)],
            diagnostic: true,
        }
    }

    /// The generated procedures, in declaration order.
    #[must_use]
    pub fn tests(&self) -> &[GeneratedTest] {
        &self.tests
    }

    /// Number of generated procedures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// `true` when the suite holds no procedures. Never true in practice:
    /// even an invalid configuration yields the diagnostic procedure.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// `true` when this suite is the diagnostic stand-in for an invalid
    /// configuration.
    #[must_use]
    pub fn is_diagnostic(&self) -> bool {
        self.diagnostic
    }

    /// Run every procedure, each against a fresh harness from `fresh`.
    pub fn run<H, F>(&self, mut fresh: F) -> Vec<TestReport>
    where
        H: Harness,
        F: FnMut() -> H,
    {
        self.tests
            .iter()
            .map(|test| {
                let mut harness = fresh();
                let mut ctx = TestContext::new(&mut harness);
                TestReport {
                    name: test.name().to_owned(),
                    doc: test.doc().to_owned(),
                    outcome: test.execute(&mut ctx),
                }
            })
            .collect()
    }

    /// Run every procedure and panic on the first failure, naming the
    /// procedure, its documentation, and the failure.
    pub fn run_and_assert<H, F>(&self, fresh: F)
    where
        H: Harness,
        F: FnMut() -> H,
    {
        for report in self.run(fresh) {
            if let Err(failure) = &report.outcome {
                panic!(
                    "test '{}' ({}) failed: {failure}",
                    report.name, report.doc
                );
            }
        }
    }
}

/// Build the suite for a declared configuration.
///
/// Validation success yields one procedure per specification, with
/// suite-wide unique names. Validation failure yields exactly one
/// diagnostic procedure — no partial attachment of valid entries from the
/// same batch.
#[must_use]
pub fn build_suite(entries: &[SpecEntry]) -> Suite {
    match prepare_configuration(entries) {
        Ok(specs) => {
            let mut seen = HashSet::new();
            let mut tests = Vec::with_capacity(specs.len());
            for spec in specs {
                // Suffixes are random; regenerate on the rare collision.
                let test = loop {
                    let candidate = generate_test(spec.clone());
                    if seen.insert(candidate.name().to_owned()) {
                        break candidate;
                    }
                };
                tests.push(test);
            }
            Suite {
                tests,
                diagnostic: false,
            }
        }
        Err(error) => Suite::diagnostic(error),
    }
}
