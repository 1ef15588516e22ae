//! Collaborator seams: router, auth, and HTTP test client.
//!
//! The engine owns none of these mechanics. It needs exactly three things
//! from the host framework — resolve a target to a path, log a user in,
//! perform a request — and they live on one object-safe [`Harness`] trait
//! so generated procedures stay non-generic behind `&mut dyn Harness`.
//!
//! Collaborator failures are carried through unmodified as [`CollabError`];
//! this crate never catches or reinterprets them.

use crate::entry::Params;
use crate::spec::{HttpMethod, UrlArgs};

/// Boxed collaborator error, propagated without reinterpretation.
pub type CollabError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The contract the engine consumes from the host web framework.
///
/// Implementations are per-test sessions: login state set by
/// [`login`](Harness::login) must be visible to subsequent
/// [`perform`](Harness::perform) calls on the same instance, and a fresh
/// instance must start logged out.
pub trait Harness {
    /// Resolve a route name or literal path into a concrete request path.
    ///
    /// # Errors
    ///
    /// Fails when the target is unknown to the router; the error surfaces
    /// as a test failure unmodified.
    fn resolve(&mut self, target: &str, args: &UrlArgs) -> Result<String, CollabError>;

    /// Attempt to authenticate this session. `Ok(false)` means the
    /// credentials were rejected.
    ///
    /// # Errors
    ///
    /// Fails when the auth collaborator itself breaks (as opposed to
    /// rejecting the credentials).
    fn login(&mut self, credentials: &Params) -> Result<bool, CollabError>;

    /// Perform an HTTP request and report the response surface the engine
    /// asserts on.
    ///
    /// # Errors
    ///
    /// Fails when the transport breaks; the error surfaces unmodified.
    fn perform(
        &mut self,
        method: HttpMethod,
        path: &str,
        data: &Params,
    ) -> Result<Response, CollabError>;
}

/// The response surface generated procedures assert on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Redirect target, when the response is a redirect.
    pub redirect_to: Option<String>,
}

/// Per-procedure execution context.
///
/// Holds the harness handle and a free-form stash. The stash is how a value
/// created during `initialize` (say, a seeded user's id) reaches a later
/// producer — within the same procedure only; contexts are built fresh per
/// run and never shared.
pub struct TestContext<'h> {
    /// The collaborator bundle for this run.
    pub harness: &'h mut dyn Harness,
    stash: Params,
}

impl<'h> TestContext<'h> {
    /// Wrap a harness for one procedure run.
    pub fn new(harness: &'h mut dyn Harness) -> Self {
        Self {
            harness,
            stash: Params::new(),
        }
    }

    /// Store a value for later steps of the same procedure.
    pub fn stash_set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.stash.insert(key.into(), value.into());
    }

    /// Read a value stored earlier in the same procedure.
    #[must_use]
    pub fn stash_get(&self, key: &str) -> Option<&serde_json::Value> {
        self.stash.get(key)
    }

    /// The whole stash.
    #[must_use]
    pub fn stash(&self) -> &Params {
        &self.stash
    }
}
