//! TOML scenario file parsing

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::scoring::SaveClassification;
use crate::settings::{GameMode, MatchSettings};
use crate::shooting::{DiveInput, ShotInput};

/// Frames run when nothing in the file asks for more
pub const DEFAULT_FRAMES: u64 = 60;

/// Complete test definition from TOML file
#[derive(Debug, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub setup: TestSetup,
    #[serde(default)]
    pub input: Vec<FrameInput>,
    #[serde(default)]
    pub expect: TestExpectations,
}

/// Test setup configuration
#[derive(Debug, Deserialize)]
pub struct TestSetup {
    #[serde(default)]
    pub mode: GameMode,
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub policy: SaveClassification,
    /// Run at least this many frames
    pub frames: Option<u64>,
}

fn default_difficulty() -> u32 {
    100
}

impl Default for TestSetup {
    fn default() -> Self {
        Self {
            mode: GameMode::Shoot,
            difficulty: default_difficulty(),
            seed: 0,
            policy: SaveClassification::default(),
            frames: None,
        }
    }
}

impl TestSetup {
    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings::new(self.mode, self.difficulty)
            .with_seed(self.seed)
            .with_policy(self.policy)
    }
}

/// Inputs applied once the match reaches `frame` physics steps
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameInput {
    pub frame: u64,
    #[serde(default)]
    pub shoot: Option<ShotDef>,
    /// Dive key: left, right, up or down
    #[serde(default)]
    pub dive: Option<String>,
    #[serde(default)]
    pub restart: bool,
    #[serde(default)]
    pub new_game: bool,
    /// The match should turn down this input's shot or dive
    #[serde(default)]
    pub refused: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ShotDef {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    pub power: f32,
}

impl FrameInput {
    pub fn shot_input(&self) -> Option<ShotInput> {
        self.shoot
            .map(|s| ShotInput::new(Vec2::new(s.x, s.y), s.power))
    }

    pub fn dive_input(&self) -> Result<Option<DiveInput>, String> {
        match &self.dive {
            None => Ok(None),
            Some(name) => DiveInput::from_name(name)
                .map(Some)
                .ok_or_else(|| format!("frame {}: unknown dive '{}'", self.frame, name)),
        }
    }
}

/// Expected test outcomes
#[derive(Debug, Default, Deserialize)]
pub struct TestExpectations {
    #[serde(default)]
    pub sequence: Vec<ExpectedEvent>,
    /// Multiple state assertions at different frames (uses [[expect.state]] TOML syntax)
    #[serde(default)]
    pub state: Vec<StateAssertion>,
}

/// Expected event in sequence
#[derive(Debug, Deserialize)]
pub struct ExpectedEvent {
    pub event: String,
    pub frame_min: Option<u64>,
    pub frame_max: Option<u64>,
}

/// State assertion after simulation
#[derive(Debug, Clone, Deserialize)]
pub struct StateAssertion {
    pub after_frame: u64,
    #[serde(default)]
    pub checks: Vec<String>,
}

impl TestDefinition {
    /// Last frame anything in the file refers to
    pub fn last_frame(&self) -> u64 {
        let inputs = self.input.iter().map(|i| i.frame);
        let states = self.expect.state.iter().map(|s| s.after_frame);
        let windows = self.expect.sequence.iter().filter_map(|e| e.frame_max);
        inputs
            .chain(states)
            .chain(windows)
            .chain(self.setup.frames)
            .max()
            .unwrap_or(DEFAULT_FRAMES)
    }

    /// Reject inputs the runner could not apply
    pub fn validate(&self) -> Result<(), String> {
        for input in &self.input {
            input.dive_input()?;
            if input.shoot.is_some_and(|s| !s.power.is_finite()) {
                return Err(format!("frame {}: shot power must be a number", input.frame));
            }
        }
        for exp in &self.expect.sequence {
            if let (Some(min), Some(max)) = (exp.frame_min, exp.frame_max)
                && min > max
            {
                return Err(format!("'{}': frame_min {} > frame_max {}", exp.event, min, max));
            }
        }
        Ok(())
    }
}

/// Parse a test definition from TOML text
pub fn parse_test_str(content: &str, path: &Path) -> Result<TestDefinition, ConfigError> {
    let def: TestDefinition = toml::from_str(content).map_err(|e| ConfigError::toml(path, e))?;
    def.validate().map_err(|m| ConfigError::invalid(path, m))?;
    Ok(def)
}

/// Parse a test file from path
pub fn parse_test_file(path: &Path) -> Result<TestDefinition, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    parse_test_str(&content, path)
}
