//! Match settings chosen before kick-off
//!
//! Loaded from and saved to config/match_settings.json. Missing fields fall
//! back to defaults so old files keep working.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::*;
use crate::error::ConfigError;
use crate::goalkeeper::KeeperControl;
use crate::scoring::SaveClassification;

/// Path to the settings file
pub const MATCH_SETTINGS_FILE: &str = "config/match_settings.json";

/// Selectable teams (code, display name). Purely cosmetic.
pub const COUNTRIES: &[(&str, &str)] = &[
    ("br", "Brazil"),
    ("ar", "Argentina"),
    ("fr", "France"),
    ("de", "Germany"),
    ("es", "Spain"),
    ("it", "Italy"),
    ("gb", "England"),
    ("pt", "Portugal"),
    ("nl", "Netherlands"),
    ("be", "Belgium"),
];

pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Which side of the penalty the human plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Take the shots against an AI keeper
    #[default]
    Shoot,
    /// Keep goal against automatic shots
    Save,
}

impl GameMode {
    pub fn name(&self) -> &'static str {
        match self {
            GameMode::Shoot => "shoot",
            GameMode::Save => "save",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "shoot" => Some(GameMode::Shoot),
            "save" => Some(GameMode::Save),
            _ => None,
        }
    }

    /// Who drives the keeper in this mode
    pub fn keeper_control(&self) -> KeeperControl {
        match self {
            GameMode::Shoot => KeeperControl::Ai,
            GameMode::Save => KeeperControl::Player,
        }
    }
}

fn default_difficulty() -> u32 {
    1
}
fn default_country() -> String {
    "br".to_string()
}
fn default_fixed_hz() -> f64 {
    FIXED_HZ
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSettings {
    #[serde(default)]
    pub mode: GameMode,
    /// Base difficulty 0-100; the keeper gets harder each level on top of it
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    #[serde(default = "default_country")]
    pub country: String,
    /// RNG seed. None picks one from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Physics steps per second
    #[serde(default = "default_fixed_hz")]
    pub fixed_hz: f64,
    #[serde(default)]
    pub save_policy: SaveClassification,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            difficulty: default_difficulty(),
            country: default_country(),
            seed: None,
            fixed_hz: default_fixed_hz(),
            save_policy: SaveClassification::default(),
        }
    }
}

impl MatchSettings {
    pub fn new(mode: GameMode, difficulty: u32) -> Self {
        Self {
            mode,
            difficulty,
            ..Default::default()
        }
        .sanitized()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_policy(mut self, policy: SaveClassification) -> Self {
        self.save_policy = policy;
        self
    }

    /// Clamp out-of-range values instead of rejecting them
    pub fn sanitized(mut self) -> Self {
        if self.difficulty > MAX_DIFFICULTY {
            warn!("difficulty {} out of range, clamping to {}", self.difficulty, MAX_DIFFICULTY);
            self.difficulty = MAX_DIFFICULTY;
        }
        if !self.fixed_hz.is_finite() || self.fixed_hz <= 0.0 {
            warn!("fixed_hz {} invalid, using {}", self.fixed_hz, FIXED_HZ);
            self.fixed_hz = FIXED_HZ;
        } else if self.fixed_hz < MIN_FIXED_HZ {
            warn!("fixed_hz {} too coarse, clamping to {}", self.fixed_hz, MIN_FIXED_HZ);
            self.fixed_hz = MIN_FIXED_HZ;
        }
        if country_name(&self.country).is_none() {
            warn!("unknown country '{}', using {}", self.country, default_country());
            self.country = default_country();
        }
        self
    }

    /// Fixed physics step in seconds
    pub fn step_secs(&self) -> f32 {
        (1.0 / self.fixed_hz) as f32
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let settings: MatchSettings =
            serde_json::from_str(&content).map_err(|e| ConfigError::json(path, e))?;
        Ok(settings.sanitized())
    }

    /// Load settings from file, or return defaults if it is missing or broken
    pub fn load() -> Self {
        let path = Path::new(MATCH_SETTINGS_FILE);
        if !path.exists() {
            info!("No match_settings.json found, using defaults");
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(settings) => {
                info!("Loaded settings from {}", MATCH_SETTINGS_FILE);
                settings
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::json(path, e))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Saved settings to {}", path.display());
        Ok(())
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(MATCH_SETTINGS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: MatchSettings = serde_json::from_str(r#"{"mode":"save"}"#).unwrap();
        assert_eq!(settings.mode, GameMode::Save);
        assert_eq!(settings.difficulty, 1);
        assert_eq!(settings.country, "br");
        assert_eq!(settings.fixed_hz, FIXED_HZ);
        assert_eq!(settings.save_policy, SaveClassification::Continuous);
    }

    #[test]
    fn test_sanitize_clamps() {
        let settings = MatchSettings {
            difficulty: 250,
            fixed_hz: 0.0,
            country: "xx".to_string(),
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.difficulty, 100);
        assert_eq!(settings.fixed_hz, FIXED_HZ);
        assert_eq!(settings.country, "br");
    }

    #[test]
    fn test_coarse_step_rate_is_clamped() {
        let settings = MatchSettings {
            fixed_hz: 30.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.fixed_hz, MIN_FIXED_HZ);

        let fine = MatchSettings {
            fixed_hz: 120.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(fine.fixed_hz, 120.0);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("penaltykick-settings-{}", std::process::id()));
        let path = dir.join("match_settings.json");
        let settings = MatchSettings::new(GameMode::Save, 40)
            .with_seed(9)
            .with_policy(SaveClassification::FirstContact);
        settings.save_to(&path).unwrap();
        let loaded = MatchSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = MatchSettings::load_from("does/not/exist.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(GameMode::from_name("SAVE"), Some(GameMode::Save));
        assert_eq!(GameMode::from_name("dribble"), None);
        assert_eq!(GameMode::Save.keeper_control(), KeeperControl::Player);
        assert_eq!(country_name("GB"), Some("England"));
    }
}
