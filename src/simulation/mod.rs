//! Simulation module - headless bot matches
//!
//! Runs the match without rendering, with bots on the human side, and
//! collects outcome metrics across seeds and difficulties.

pub mod app_builder;
pub mod bots;
pub mod config;
pub mod metrics;
pub mod parallel;
pub mod runner;

pub use app_builder::HeadlessAppBuilder;
pub use bots::{BotProfile, KeeperBot, ShooterBot, read_flight};
pub use config::{SIM_SETTINGS_FILE, SWEEP_DIFFICULTIES, SimConfig, SimMode};
pub use metrics::{DifficultyStats, EndReason, MatchResult, SimMetrics, SimSummary};
pub use parallel::{MatchConfig, init_parallel, match_configs, run_matches_parallel};
pub use runner::{SimBots, SimControl, SimReport, drive_bots, run_match, run_simulation};
