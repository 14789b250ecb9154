//! Read-only view of a match for UI, logs and scenario checks

use serde::{Deserialize, Serialize};

use crate::game::state::{GameOverReason, Phase};
use crate::scoring::ShotOutcome;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub score: u32,
    pub shots_taken: u32,
    pub max_shots: u32,
    pub level: u32,
    pub max_level: u32,
    pub level_goals: u32,
    pub level_goals_required: u32,
    pub phase: Phase,
    pub game_over: Option<GameOverReason>,
    pub last_outcome: Option<ShotOutcome>,
    /// Save-mode countdown number, if counting
    pub countdown: Option<u32>,
    pub prompt: String,
    pub ball_position: [f32; 3],
    pub ball_moving: bool,
    pub keeper_position: [f32; 3],
    pub keeper_diving: bool,
    pub keeper_difficulty: u32,
    pub step: u64,
    pub elapsed_secs: f64,
}

impl MatchSnapshot {
    /// Named integer field, for scenario checks
    pub fn counter(&self, name: &str) -> Option<i64> {
        let value = match name {
            "score" => self.score,
            "shots_taken" | "shots" => self.shots_taken,
            "max_shots" => self.max_shots,
            "level" => self.level,
            "max_level" => self.max_level,
            "level_goals" => self.level_goals,
            "level_goals_required" => self.level_goals_required,
            "keeper_difficulty" => self.keeper_difficulty,
            "countdown" => self.countdown.unwrap_or(0),
            _ => return None,
        };
        Some(value as i64)
    }
}
