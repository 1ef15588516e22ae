//! Conformance fixture runner.
//!
//! Loads YAML fixtures and runs them against the suite builder. The
//! `tests` field carries the raw declarative configuration in the exact
//! shape users write in suite files; fixtures therefore exercise the
//! production loading pipeline: raw value → entries → validation → suite →
//! execution against a [`StubApp`].
//!
//! Fixtures are test tooling: a structurally broken fixture file panics
//! with a message naming the fixture rather than returning an error.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use smoke::{suite_from_value, HttpMethod};

use crate::{StubApp, StubAppBuilder};

/// A complete conformance fixture.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Stub application setup.
    #[serde(default)]
    pub app: AppConfig,
    /// Raw declarative configuration, exactly as a suite file would carry it.
    pub tests: Value,
    /// When `true`, the configuration must produce the diagnostic suite.
    #[serde(default)]
    pub expect_error: bool,
    /// Fragments the diagnostic message must contain.
    #[serde(default)]
    pub error_contains: Vec<String>,
}

/// Stub application setup from YAML.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Route name → `:param` path template.
    #[serde(default)]
    pub routes: BTreeMap<String, String>,
    /// Username → password.
    #[serde(default)]
    pub users: BTreeMap<String, String>,
    /// Scripted responses.
    #[serde(default)]
    pub responses: Vec<ResponseConfig>,
}

/// One scripted response from YAML.
#[derive(Debug, Deserialize)]
pub struct ResponseConfig {
    pub method: String,
    pub path: String,
    #[serde(default = "default_status")]
    pub status: u16,
    /// Redirect target for redirect responses.
    #[serde(default)]
    pub redirect: Option<String>,
    /// When `true`, the view requires a logged-in session.
    #[serde(default)]
    pub requires_login: bool,
    /// Where anonymous sessions get redirected for guarded views.
    #[serde(default)]
    pub anon_redirect: Option<String>,
}

fn default_status() -> u16 {
    200
}

impl Fixture {
    /// Parse a single fixture from YAML.
    ///
    /// # Errors
    ///
    /// Returns the YAML parse error unmodified.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML stream with `---` separators.
    ///
    /// # Errors
    ///
    /// Returns the YAML parse error unmodified.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Build the stub application this fixture runs against.
    ///
    /// # Panics
    ///
    /// Panics on a structurally broken fixture (unknown HTTP method in a
    /// scripted response).
    #[must_use]
    pub fn build_app(&self) -> StubApp {
        let mut builder = StubApp::builder();
        for (name, template) in &self.app.routes {
            builder = builder.route(name, template);
        }
        for (username, password) in &self.app.users {
            builder = builder.user(username, password);
        }
        for response in &self.app.responses {
            builder = add_response(builder, &self.name, response);
        }
        builder.build()
    }

    /// Build the suite and check every expectation, panicking with the
    /// fixture name on the first mismatch.
    pub fn run_and_assert(&self) {
        let suite = suite_from_value(&self.tests);

        if self.expect_error {
            assert!(
                suite.is_diagnostic(),
                "fixture '{}': expected a configuration error, got {} test(s)",
                self.name,
                suite.len()
            );
            let app = self.build_app();
            let reports = suite.run(|| app.clone());
            let failure = reports[0]
                .outcome
                .as_ref()
                .expect_err("diagnostic procedure always fails")
                .to_string();
            for fragment in &self.error_contains {
                assert!(
                    failure.contains(fragment),
                    "fixture '{}': diagnostic message missing \"{fragment}\":\n{failure}",
                    self.name
                );
            }
            return;
        }

        assert!(
            !suite.is_diagnostic(),
            "fixture '{}': configuration unexpectedly invalid: {}",
            self.name,
            suite
                .run(|| self.build_app())
                .first()
                .and_then(|report| report.outcome.as_ref().err().map(ToString::to_string))
                .unwrap_or_default()
        );

        let app = self.build_app();
        for report in suite.run(|| app.clone()) {
            if let Err(failure) = &report.outcome {
                panic!(
                    "fixture '{}' test '{}' ({}) failed: {failure}",
                    self.name, report.name, report.doc
                );
            }
        }
    }
}

fn add_response(builder: StubAppBuilder, fixture: &str, config: &ResponseConfig) -> StubAppBuilder {
    let method = HttpMethod::parse(&config.method).unwrap_or_else(|| {
        panic!(
            "fixture '{fixture}': unknown HTTP method \"{}\" in scripted response",
            config.method
        )
    });

    if config.requires_login {
        let anon_redirect = config
            .anon_redirect
            .clone()
            .unwrap_or_else(|| "/login/".to_owned());
        builder.guarded(method, &config.path, config.status, anon_redirect)
    } else if let Some(location) = &config.redirect {
        builder.redirect(method, &config.path, config.status, location)
    } else {
        builder.respond(method, &config.path, config.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_fixture() {
        let yaml = r#"
name: basic
description: named route answers 200
app:
  routes:
    "admin:login": /admin/login/
  responses:
    - { method: get, path: /admin/login/, status: 200 }
tests:
  - ["admin:login", 200, "GET"]
"#;
        let fixture = Fixture::from_yaml(yaml).unwrap();
        assert_eq!(fixture.name, "basic");
        assert!(!fixture.expect_error);
        fixture.run_and_assert();
    }

    #[test]
    fn parse_multi_document_stream() {
        let yaml = r#"
name: first
tests:
  - ["/a/", 404, "GET"]
---
name: second
tests: []
expect_error: true
error_contains: ["empty configuration"]
"#;
        let fixtures = Fixture::from_yaml_multi(yaml).unwrap();
        assert_eq!(fixtures.len(), 2);
        for fixture in &fixtures {
            fixture.run_and_assert();
        }
    }

    #[test]
    #[should_panic(expected = "unknown HTTP method")]
    fn broken_fixture_method_panics() {
        let yaml = r#"
name: broken
app:
  responses:
    - { method: fetch, path: /x/ }
tests:
  - ["/x/", 200, "GET"]
"#;
        Fixture::from_yaml(yaml).unwrap().run_and_assert();
    }
}
