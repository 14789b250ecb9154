//! Scenario test runner CLI
//!
//! Usage:
//!   cargo run --bin test-scenarios                      # Run all scenarios
//!   cargo run --bin test-scenarios -- shooting/         # Run category
//!   cargo run --bin test-scenarios -- saving/countdown  # Run single scenario
//!   cargo run --bin test-scenarios -- --list            # List without running
//!   cargo run --bin test-scenarios -- --verbose         # Show details on failure

use std::env;
use std::path::{Path, PathBuf};

use penaltykick::testing::{
    SCENARIOS_DIR, TestResult, discover_scenarios, parse_test_file, run_test,
};

#[derive(Default)]
struct Tally {
    passed: u32,
    failed: u32,
    errors: u32,
}

impl Tally {
    fn record(&mut self, result: &TestResult) {
        match result {
            TestResult::Pass { .. } => self.passed += 1,
            TestResult::Fail { .. } => self.failed += 1,
            TestResult::Error { .. } => self.errors += 1,
        }
    }

    fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let list_only = args.iter().any(|a| a == "--list");
    let filter = args.iter().find(|a| !a.starts_with('-')).cloned();

    let scenarios_path = Path::new(SCENARIOS_DIR);
    if !scenarios_path.exists() {
        eprintln!("No scenarios directory found at {}", SCENARIOS_DIR);
        std::process::exit(1);
    }

    let tests = discover_scenarios(scenarios_path, filter.as_deref());
    if tests.is_empty() {
        eprintln!(
            "No scenario files found{}",
            filter.map(|f| format!(" matching '{}'", f)).unwrap_or_default()
        );
        std::process::exit(1);
    }

    if list_only {
        for path in &tests {
            println!("{}", relative(scenarios_path, path).display());
        }
        return;
    }

    println!("Penalty Scenarios");
    println!("=================\n");

    let mut tally = Tally::default();
    let mut current_category = PathBuf::new();

    for test_path in &tests {
        let rel_path = relative(scenarios_path, test_path);

        if let Some(parent) = rel_path.parent()
            && parent != current_category
            && !parent.as_os_str().is_empty()
        {
            println!("{}/", parent.display());
            current_category = parent.to_path_buf();
        }

        let test_name = rel_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let result = match parse_test_file(test_path) {
            Ok(def) => {
                if verbose && let Some(description) = &def.description {
                    println!("  # {}", description.trim());
                }
                run_test(&def)
            }
            Err(e) => TestResult::Error {
                message: e.to_string(),
            },
        };

        tally.record(&result);
        print_result(&test_name, &result, verbose);
    }

    println!("\n=================");
    println!(
        "Results: {} passed, {} failed, {} errors",
        tally.passed, tally.failed, tally.errors
    );

    if !tally.all_passed() {
        std::process::exit(1);
    }
}

fn relative<'a>(base: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(base).unwrap_or(path)
}

fn print_result(name: &str, result: &TestResult, verbose: bool) {
    let dots = ".".repeat(40 - name.len().min(39));

    match result {
        TestResult::Pass { frames } => {
            println!("  {} {} PASS ({} frames)", name, dots, frames);
        }
        TestResult::Fail { error } => {
            println!("  {} {} FAIL", name, dots);
            if verbose {
                println!("    {}", error);
            } else {
                println!("    {}", error.message);
            }
        }
        TestResult::Error { message } => {
            println!("  {} {} ERROR", name, dots);
            println!("    {}", message);
        }
    }
}
