//! smoke CLI — driving adapter for the smoke suite builder.
//!
//! Subcommands:
//! - `check <suite>` — validate a suite file, printing the combined error
//! - `list <suite>` — print the generated test names and documentation
//! - `info` — print supported methods, recognized options, redirect codes

use std::process;

use smoke::prelude::*;
use smoke::{suite_entries, DIAGNOSTIC_TEST_NAME, RECOGNIZED_OPTIONS, REDIRECT_STATUSES};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "check" => cmd_check(&args[2..]),
        "list" => cmd_list(&args[2..]),
        "info" => cmd_info(),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_check(args: &[String]) -> Result<(), String> {
    let path = suite_path(args, "check")?;
    let root = load_suite(path)?;

    let specs = suite_entries(&root)
        .and_then(|entries| prepare_configuration(&entries))
        .map_err(|e| e.to_string())?;

    println!("Configuration valid ({} test(s))", specs.len());
    Ok(())
}

fn cmd_list(args: &[String]) -> Result<(), String> {
    let path = suite_path(args, "list")?;
    let root = load_suite(path)?;

    let suite = smoke::suite_from_value(&root);
    if suite.is_diagnostic() {
        let mut harness = NoopHarness;
        let mut ctx = TestContext::new(&mut harness);
        return match suite.tests()[0].execute(&mut ctx) {
            Err(failure) => Err(failure.to_string()),
            Ok(()) => Err("configuration invalid".to_owned()),
        };
    }

    for test in suite.tests() {
        println!("{}  {}", test.name(), test.doc());
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Uniform return type for all commands
fn cmd_info() -> Result<(), String> {
    println!("Supported methods:");
    for method in HttpMethod::ALL {
        println!("  {}", method.lower());
    }

    println!("\nRecognized options:");
    for key in RECOGNIZED_OPTIONS {
        println!("  {key}");
    }

    println!("\nRedirect statuses (redirect_to asserted):");
    for status in REDIRECT_STATUSES {
        println!("  {status}");
    }

    println!("\nDiagnostic test name: {DIAGNOSTIC_TEST_NAME}");
    Ok(())
}

/// Diagnostic procedures never touch their harness; `list` only needs a
/// stand-in to extract the failure message.
struct NoopHarness;

impl Harness for NoopHarness {
    fn resolve(&mut self, _target: &str, _args: &UrlArgs) -> Result<String, CollabError> {
        Err("no harness attached".into())
    }

    fn login(&mut self, _credentials: &Params) -> Result<bool, CollabError> {
        Err("no harness attached".into())
    }

    fn perform(
        &mut self,
        _method: HttpMethod,
        _path: &str,
        _data: &Params,
    ) -> Result<Response, CollabError> {
        Err("no harness attached".into())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Suite loading
// ═══════════════════════════════════════════════════════════════════════════════

fn suite_path<'a>(args: &'a [String], command: &str) -> Result<&'a str, String> {
    match args {
        [path] => Ok(path),
        [] => Err(format!("{command} requires a suite file path")),
        _ => Err(format!("{command} takes exactly one suite file path")),
    }
}

fn load_suite(path: &str) -> Result<serde_json::Value, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read \"{path}\": {e}"))?;
    parse_suite(&content, is_json_path(path))
}

fn is_json_path(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn parse_suite(content: &str, is_json: bool) -> Result<serde_json::Value, String> {
    if is_json {
        serde_json::from_str(content).map_err(|e| format!("JSON parse error: {e}"))
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(content).map_err(|e| format!("YAML parse error: {e}"))
    }
}

fn print_usage() {
    eprintln!(
        "Usage: smoke <command> [options]

Commands:
  check <suite>   Validate a suite file (.yaml, .yml, or .json)
  list <suite>    Print generated test names and documentation
  info            Print supported methods and recognized options
  help            Show this help"
    );
}
