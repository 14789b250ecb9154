//! Penalty Simulation Tool - headless bot matches
//!
//! Run bot matches without rendering to collect outcome metrics.
//!
//! Usage:
//!   cargo run --bin simulate -- --help
//!   cargo run --bin simulate -- --mode save --difficulty 80
//!   cargo run --bin simulate -- --matches 200 --parallel 8
//!   cargo run --bin simulate -- --sweep 20 --output sweep.json

use penaltykick::simulation::{SimConfig, run_simulation};

fn main() {
    let config = SimConfig::from_args();
    if let Err(e) = run_simulation(config) {
        eprintln!("Simulation failed: {}", e);
        std::process::exit(1);
    }
}
