//! Conformance tests that run YAML fixtures against the suite builder.
//!
//! Run with: cargo test -p smoke-test --test conformance

use std::fs;
use std::path::{Path, PathBuf};

use smoke_test::fixture::Fixture;

/// The fixtures directory shipped with this crate.
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run all fixtures in a directory.
fn run_fixtures_in_dir(dir: &Path) {
    assert!(
        dir.exists(),
        "fixtures directory does not exist: {}",
        dir.display()
    );

    let mut ran = 0;
    for entry in fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();
        if path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml")
        {
            let yaml = fs::read_to_string(&path).expect("read yaml");

            // Parse potentially multiple fixtures (separated by ---)
            let fixtures = Fixture::from_yaml_multi(&yaml)
                .unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()));

            for fixture in fixtures {
                println!("running fixture: {}", fixture.name);
                fixture.run_and_assert();
                ran += 1;
            }
        }
    }
    assert!(ran > 0, "no fixtures found in {}", dir.display());
}

#[test]
fn basic_requests() {
    run_fixtures_in_dir(&fixtures_dir().join("01_basic"));
}

#[test]
fn option_handling() {
    run_fixtures_in_dir(&fixtures_dir().join("02_options"));
}

#[test]
fn auth_and_redirects() {
    run_fixtures_in_dir(&fixtures_dir().join("03_auth_redirects"));
}

#[test]
fn configuration_diagnostics() {
    run_fixtures_in_dir(&fixtures_dir().join("04_diagnostics"));
}
