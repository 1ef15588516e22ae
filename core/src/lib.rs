//! smoke — declarative smoke-test suite builder for HTTP applications
//!
//! Describe a list of `(target, expected status, method, options)` entries
//! and get back a suite of uniquely named, documented, runnable test
//! procedures that resolve a URL, optionally log in, perform the request,
//! and assert on the response.
//!
//! # Architecture
//!
//! - [`SpecEntry`] — raw declaration, deliberately unchecked
//! - [`prepare_configuration`] — validation + normalization into [`TestSpec`]s,
//!   accumulating **every** violation into one [`ConfigError`]
//! - [`generate_test`] — one [`TestSpec`] → one runnable [`GeneratedTest`]
//! - [`build_suite`] — whole configuration → [`Suite`]; an invalid
//!   configuration becomes a single always-failing diagnostic procedure
//!   instead of aborting discovery
//! - [`Harness`] — the seam to the host framework: resolve a target,
//!   log a user in, perform a request. The engine owns no HTTP mechanics.
//!
//! # Key Design Insights
//!
//! 1. **All-or-nothing validation**: a configuration either yields every
//!    procedure or exactly one diagnostic; valid entries are never attached
//!    alongside an invalid batch.
//!
//! 2. **Callable-or-literal options**: `url_kwargs`, `request_data`, and
//!    `user_credentials` are [`ValueSource`]s — declared literally or
//!    produced at run time from the test context.
//!
//! 3. **Non-generic procedures**: generated tests hold `&mut dyn Harness`,
//!    so one suite type serves every host framework adapter.
//!
//! # Example
//!
//! ```
//! use smoke::prelude::*;
//!
//! struct PingApp;
//!
//! impl Harness for PingApp {
//!     fn resolve(&mut self, target: &str, _args: &UrlArgs) -> Result<String, CollabError> {
//!         match target {
//!             "ping" => Ok("/ping/".to_owned()),
//!             other => Err(format!("unknown route \"{other}\"").into()),
//!         }
//!     }
//!
//!     fn login(&mut self, _credentials: &Params) -> Result<bool, CollabError> {
//!         Ok(false)
//!     }
//!
//!     fn perform(
//!         &mut self,
//!         _method: HttpMethod,
//!         path: &str,
//!         _data: &Params,
//!     ) -> Result<Response, CollabError> {
//!         let status = if path == "/ping/" { 200 } else { 404 };
//!         Ok(Response { status, redirect_to: None })
//!     }
//! }
//!
//! let suite = build_suite(&[SpecEntry::new("ping", 200, "GET")]);
//! let reports = suite.run(|| PingApp);
//! assert!(reports.iter().all(|report| report.passed()));
//! ```
//!
//! # Extensions
//!
//! - [`smoke-test`](https://docs.rs/smoke-test) — in-memory stub
//!   application and YAML fixture runner for conformance (internal)

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod config;
mod doc;
mod entry;
mod harness;
mod name;
mod runner;
mod spec;
mod validate;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Raw declarations
pub use entry::{EntryValue, OptionMap, OptionValue, Params, SpecEntry};

// Validated specifications
pub use spec::{
    ArgsFn, HttpMethod, InitFn, InitHook, Options, ParamsFn, TestSpec, UrlArgs, ValueSource,
};

// Validation
pub use validate::{prepare_configuration, ConfigError, SpecField, Violation, RECOGNIZED_OPTIONS};

// Generation
pub use doc::{prepare_test_doc, status_text};
pub use name::{prepare_test_name, slug};
pub use runner::{
    build_suite, generate_diagnostic_test, generate_test, GeneratedTest, Suite, TestFailure,
    TestFn, TestReport,
};

// Collaborator seams
pub use harness::{CollabError, Harness, Response, TestContext};

// Config-file front door
pub use config::{entry_from_value, suite_entries, suite_from_value};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use smoke::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        build_suite,
        prepare_configuration,
        // Collaborator seams
        CollabError,
        ConfigError,
        GeneratedTest,
        Harness,
        // Core types
        HttpMethod,
        OptionValue,
        Params,
        Response,
        SpecEntry,
        Suite,
        TestContext,
        TestFailure,
        TestReport,
        TestSpec,
        UrlArgs,
        ValueSource,
        Violation,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum number of specifications in a single configuration.
///
/// Width guard: a declarative list is developer-written, but a generated or
/// concatenated one can balloon; cap it at config time rather than building
/// an unbounded suite.
pub const MAX_SPECS: usize = 1024;

/// Status codes for which a declared `redirect_to` target is asserted.
pub const REDIRECT_STATUSES: [u16; 4] = [301, 302, 303, 307];

/// Fixed name of the single diagnostic procedure substituted for an entire
/// invalid configuration.
pub const DIAGNOSTIC_TEST_NAME: &str = "smoke_configuration_error";
