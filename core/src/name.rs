//! Generated test names.
//!
//! `smoke_<slug>_<method>_<status>_<suffix>`: the slug is derived from the
//! target, the suffix is random. Two entries against the same route with
//! different preconditions must not collide, and the suffix must not be
//! derivable from spec content — callers must never rely on its value.
//! [`build_suite`](crate::build_suite) additionally enforces suite-wide
//! uniqueness with a seen-set.

use crate::spec::HttpMethod;

/// Turn a target into a name-safe slug: strip leading/trailing slashes,
/// then map namespace separators and path slashes to underscores.
#[must_use]
pub fn slug(target: &str) -> String {
    target.trim_matches('/').replace([':', '/'], "_")
}

/// Derive a test name for one specification.
#[must_use]
pub fn prepare_test_name(target: &str, method: HttpMethod, status: u16) -> String {
    format!(
        "smoke_{}_{}_{}_{:08x}",
        slug(target),
        method.lower(),
        status,
        rand::random::<u32>()
    )
}
