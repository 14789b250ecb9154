//! Simulation configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::MAX_DIFFICULTY;
use crate::error::ConfigError;
use crate::scoring::SaveClassification;
use crate::settings::{GameMode, MatchSettings};

use super::bots::BotProfile;

/// Simulation mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum SimMode {
    /// Run a single match
    #[default]
    Single,
    /// Run multiple matches with same config
    MultiMatch { count: u32 },
    /// Run the same bots at difficulty 0, 25, 50, 75 and 100
    DifficultySweep { matches_per_difficulty: u32 },
}

/// Difficulties visited by a sweep
pub const SWEEP_DIFFICULTIES: [u32; 5] = [0, 25, 50, 75, 100];

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Simulation mode
    pub mode: SimMode,
    /// Which side the bot plays
    pub game_mode: GameMode,
    /// Base difficulty 0-100
    pub difficulty: u32,
    /// End the match once this level is cleared
    pub max_level: u32,
    /// Match duration limit in simulated seconds
    pub duration_limit: f32,
    /// Physics steps per second
    pub fixed_hz: f64,
    pub save_policy: SaveClassification,
    /// Bot skill
    pub bot: BotProfile,
    /// RNG seed for reproducibility (None = random)
    pub seed: Option<u64>,
    /// Output file path (None = stdout)
    pub output_file: Option<String>,
    /// Suppress progress output
    pub quiet: bool,
    /// Number of parallel threads (0 = sequential, N = N threads)
    pub parallel: usize,
    /// Write each match's events to logs/
    pub log_events: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode: SimMode::Single,
            game_mode: GameMode::Shoot,
            difficulty: 50,
            max_level: 5,
            duration_limit: 600.0,
            fixed_hz: crate::constants::FIXED_HZ,
            save_policy: SaveClassification::default(),
            bot: BotProfile::default(),
            seed: None,
            output_file: None,
            quiet: false,
            parallel: 0,
            log_events: false,
        }
    }
}

/// Local simulation settings
pub const SIM_SETTINGS_FILE: &str = "config/simulation_settings.json";

impl SimConfig {
    /// Load configuration from a JSON settings file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        serde_json::from_str(&contents).map_err(|e| ConfigError::json(path, e))
    }

    /// Load configuration from the settings file, or built-in defaults
    pub fn from_config_files() -> Self {
        if Path::new(SIM_SETTINGS_FILE).exists() {
            match Self::from_file(SIM_SETTINGS_FILE) {
                Ok(config) => return config,
                Err(e) => eprintln!("Warning: {}", e),
            }
        }
        Self::default()
    }

    /// Match settings for one match of this run
    pub fn match_settings(&self, seed: u64) -> MatchSettings {
        MatchSettings {
            mode: self.game_mode,
            difficulty: self.difficulty.min(MAX_DIFFICULTY),
            seed: Some(seed),
            fixed_hz: self.fixed_hz,
            save_policy: self.save_policy,
            ..Default::default()
        }
        .sanitized()
    }

    /// Upper bound on physics steps for one match
    pub fn step_limit(&self) -> u64 {
        let hz = self.match_settings(0).fixed_hz;
        (self.duration_limit.max(0.0) as f64 * hz).ceil() as u64 + 1
    }

    /// Parse configuration from command line arguments
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();

        // Start with config files as base
        let mut config = Self::from_config_files();

        // Check for explicit settings file override
        if let Some(pos) = args.iter().position(|a| a == "--settings")
            && let Some(path) = args.get(pos + 1)
        {
            match Self::from_file(path) {
                Ok(loaded) => config = loaded,
                Err(e) => eprintln!("Warning: {}", e),
            }
        }

        if !config.apply_args(&args[1..]) {
            print_help();
            std::process::exit(0);
        }
        config
    }

    /// Apply command line overrides. Returns false when help was requested.
    pub fn apply_args(&mut self, args: &[String]) -> bool {
        let mut i = 0;
        while i < args.len() {
            let value = args.get(i + 1);
            match args[i].as_str() {
                "--settings" => {
                    // Already handled by from_args
                    i += 1;
                }
                "--mode" => {
                    if let Some(mode) = value.and_then(|v| GameMode::from_name(v)) {
                        self.game_mode = mode;
                        i += 1;
                    }
                }
                "--difficulty" => {
                    if let Some(v) = value {
                        self.difficulty = v.parse().unwrap_or(self.difficulty).min(MAX_DIFFICULTY);
                        i += 1;
                    }
                }
                "--max-level" => {
                    if let Some(v) = value {
                        self.max_level = v.parse().unwrap_or(self.max_level).max(1);
                        i += 1;
                    }
                }
                "--duration" => {
                    if let Some(v) = value {
                        self.duration_limit = v.parse().unwrap_or(self.duration_limit);
                        i += 1;
                    }
                }
                "--policy" => {
                    if let Some(v) = value {
                        match v.to_ascii_lowercase().as_str() {
                            "continuous" => self.save_policy = SaveClassification::Continuous,
                            "first-contact" | "first_contact" => {
                                self.save_policy = SaveClassification::FirstContact
                            }
                            other => eprintln!("Warning: unknown save policy '{}'", other),
                        }
                        i += 1;
                    }
                }
                "--matches" => {
                    if let Some(v) = value {
                        let count = v.parse().unwrap_or(1);
                        self.mode = SimMode::MultiMatch { count };
                        i += 1;
                    }
                }
                "--sweep" => {
                    let matches = match value {
                        Some(v) if !v.starts_with('-') => {
                            i += 1;
                            v.parse().unwrap_or(10)
                        }
                        _ => 10,
                    };
                    self.mode = SimMode::DifficultySweep {
                        matches_per_difficulty: matches,
                    };
                }
                "--seed" => {
                    if let Some(v) = value {
                        self.seed = v.parse().ok();
                        i += 1;
                    }
                }
                "--output" => {
                    if let Some(v) = value {
                        self.output_file = Some(v.clone());
                        i += 1;
                    }
                }
                "--quiet" | "-q" => {
                    self.quiet = true;
                }
                "--parallel" => {
                    if let Some(v) = value {
                        self.parallel = v.parse().unwrap_or(0);
                        i += 1;
                    }
                }
                "--log-events" => {
                    self.log_events = true;
                }
                "--help" | "-h" => return false,
                other => eprintln!("Warning: ignoring unknown argument '{}'", other),
            }
            i += 1;
        }
        true
    }
}

fn print_help() {
    println!(
        r#"Penalty Simulation Tool - Headless bot matches

USAGE:
    cargo run --bin simulate -- [OPTIONS]

OPTIONS:
    --settings <FILE>   Load settings from JSON file (CLI args override file settings)
    --mode <MODE>       shoot (bot shoots at the AI keeper) or save (bot keeps goal)
    --difficulty <N>    Base difficulty 0-100 (default: 50)
    --max-level <N>     End the match after clearing level N (default: 5)
    --duration <SECS>   Match duration limit in simulated seconds (default: 600)
    --policy <NAME>     Save classification: continuous or first-contact
    --matches <N>       Run N matches with same config
    --sweep [N]         Run N matches at each difficulty 0/25/50/75/100 (default: 10)
    --seed <N>          Base RNG seed; match i uses seed + i
    --output <FILE>     Output JSON to file (default: stdout)
    --quiet, -q         Suppress progress output
    --parallel <N>      Run matches in parallel with N threads
    --log-events        Write each match's events to logs/
    --help, -h          Show this help

EXAMPLES:
    # One match in save mode
    cargo run --bin simulate -- --mode save --difficulty 80 --seed 7

    # 200 matches on 8 threads
    cargo run --bin simulate -- --matches 200 --parallel 8 --output results.json

SETTINGS FILE FORMAT (JSON):
    {{
      "game_mode": "shoot",
      "difficulty": 60,
      "max_level": 3,
      "bot": {{ "aim_spread": 0.5, "charge_min": 0.25, "keeper_reaction_ms": 200 }}
    }}
"#
    );
}
