//! Parallel simulation execution
//!
//! Uses Rayon to run multiple matches concurrently. Each match runs in its
//! own Bevy app with minimal threading to avoid hitting OS thread limits.

use bevy::prelude::*;
use rayon::prelude::*;

use crate::tuning::PhysicsTweaks;

use super::config::SimConfig;
use super::metrics::MatchResult;
use super::runner::run_match;

/// Initialize the global Rayon pool with the given thread count.
/// Call this once at startup before running parallel simulations.
pub fn init_parallel(threads: usize) {
    if threads == 0 {
        // Rayon's default (auto-detect)
        return;
    }
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        warn!("Could not configure {} simulation threads: {}", threads, e);
    }
}

/// Configuration for a single match in a batch
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Run config (mode, difficulty, limits, bots)
    pub config: SimConfig,
    /// RNG seed for this match
    pub seed: u64,
}

/// One job per match; match `i` is seeded `base_seed + i`
pub fn match_configs(config: &SimConfig, count: u32, base_seed: u64) -> Vec<MatchConfig> {
    (0..count)
        .map(|i| MatchConfig {
            config: config.clone(),
            seed: base_seed.wrapping_add(i as u64),
        })
        .collect()
}

/// Run multiple matches in parallel
///
/// Returns results in the same order as configs.
pub fn run_matches_parallel(configs: &[MatchConfig], tweaks: &PhysicsTweaks) -> Vec<MatchResult> {
    configs
        .par_iter()
        .map(|job| run_match(&job.config, job.seed, tweaks))
        .collect()
}
