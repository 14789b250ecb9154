//! Scenario testing system for deterministic match testing
//!
//! Scenario files script inputs frame by frame against a seeded match and
//! check the event sequence and match state that come out.

pub mod assertions;
pub mod parser;
pub mod runner;

use std::fs;
use std::path::{Path, PathBuf};

pub use assertions::{AssertionError, CapturedEvent, check_sequence, check_state};
pub use parser::{
    ExpectedEvent, FrameInput, ShotDef, StateAssertion, TestDefinition, TestExpectations,
    TestSetup, parse_test_file, parse_test_str,
};
pub use runner::{TestResult, run_test};

/// Default path for test scenarios
pub const SCENARIOS_DIR: &str = "tests/scenarios";

/// All `.toml` files under `base`, sorted. With a filter, only paths
/// (relative to `base`) containing it.
pub fn discover_scenarios(base: &Path, filter: Option<&str>) -> Vec<PathBuf> {
    let mut tests = Vec::new();
    discover_recursive(base, base, filter, &mut tests);
    tests.sort();
    tests
}

fn discover_recursive(base: &Path, current: &Path, filter: Option<&str>, tests: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(current) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_dir() {
            discover_recursive(base, &path, filter, tests);
        } else if path.extension().is_some_and(|e| e == "toml") {
            if let Some(f) = filter {
                let rel = path.strip_prefix(base).unwrap_or(&path).to_string_lossy();
                if !rel.contains(f) {
                    continue;
                }
            }
            tests.push(path);
        }
    }
}
