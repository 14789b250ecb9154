//! Metrics collection for bot simulations

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::events::GameEvent;
use crate::game::GameOverReason;
use crate::scoring::ShotOutcome;
use crate::settings::GameMode;

/// Why a simulated match stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Out of shots on a level
    LevelFailed,
    /// Every level cleared
    AllLevelsComplete,
    /// Cleared the configured level cap
    LevelLimit,
    /// Ran out of simulated time
    TimeLimit,
}

impl From<GameOverReason> for EndReason {
    fn from(reason: GameOverReason) -> Self {
        match reason {
            GameOverReason::LevelFailed => EndReason::LevelFailed,
            GameOverReason::AllLevelsComplete => EndReason::AllLevelsComplete,
        }
    }
}

/// Running counters for the match in progress, fed from match events
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SimMetrics {
    pub shots: u32,
    pub goals: u32,
    pub saves: u32,
    pub misses: u32,
    pub keeper_dives: u32,
    pub levels_completed: u32,
    pub game_over: Option<GameOverReason>,
    /// Sum of shot powers (for the average)
    pub power_sum: f32,
}

impl SimMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ShotTaken { power, .. } => {
                self.shots += 1;
                self.power_sum += power;
            }
            GameEvent::ShotResolved { outcome, .. } => match outcome {
                ShotOutcome::Goal => self.goals += 1,
                ShotOutcome::Saved => self.saves += 1,
                ShotOutcome::Missed => self.misses += 1,
                ShotOutcome::InProgress => {}
            },
            GameEvent::KeeperDive { .. } => self.keeper_dives += 1,
            GameEvent::LevelComplete { .. } => self.levels_completed += 1,
            GameEvent::GameOver { reason, .. } => self.game_over = Some(*reason),
            _ => {}
        }
    }
}

/// Result of a single match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// RNG seed used
    pub seed: u64,
    pub mode: GameMode,
    pub difficulty: u32,
    /// Final total score
    pub score: u32,
    pub shots: u32,
    pub goals: u32,
    pub saves: u32,
    pub misses: u32,
    pub keeper_dives: u32,
    pub levels_completed: u32,
    /// Level being played when the match stopped
    pub final_level: u32,
    pub end_reason: EndReason,
    /// Simulated seconds
    pub duration: f32,
    pub steps: u64,
    /// Average shot power (0 if no shots)
    pub avg_power: f32,
}

impl MatchResult {
    /// Goals per resolved shot
    pub fn goal_rate(&self) -> f32 {
        let resolved = self.goals + self.saves + self.misses;
        if resolved == 0 {
            0.0
        } else {
            self.goals as f32 / resolved as f32
        }
    }
}

/// Aggregates for one difficulty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub matches: u32,
    pub goals: u32,
    pub saves: u32,
    pub misses: u32,
    pub goal_rate: f32,
    pub avg_level: f32,
}

/// Aggregates over a batch of matches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimSummary {
    pub matches: u32,
    pub shots: u32,
    pub goals: u32,
    pub saves: u32,
    pub misses: u32,
    pub goal_rate: f32,
    pub save_rate: f32,
    pub miss_rate: f32,
    pub avg_score: f32,
    pub avg_level: f32,
    pub best_level: u32,
    /// Matches that ended with the shot budget exhausted
    pub levels_failed: u32,
    pub by_difficulty: BTreeMap<u32, DifficultyStats>,
}

fn rate(count: u32, total: u32) -> f32 {
    if total == 0 {
        0.0
    } else {
        count as f32 / total as f32
    }
}

impl SimSummary {
    pub fn from_results(results: &[MatchResult]) -> Self {
        let mut summary = SimSummary {
            matches: results.len() as u32,
            ..Default::default()
        };
        let mut score_sum = 0u32;
        let mut level_sum = 0u32;

        for r in results {
            summary.shots += r.shots;
            summary.goals += r.goals;
            summary.saves += r.saves;
            summary.misses += r.misses;
            summary.best_level = summary.best_level.max(r.final_level);
            if r.end_reason == EndReason::LevelFailed {
                summary.levels_failed += 1;
            }
            score_sum += r.score;
            level_sum += r.final_level;

            let stats = summary.by_difficulty.entry(r.difficulty).or_default();
            stats.matches += 1;
            stats.goals += r.goals;
            stats.saves += r.saves;
            stats.misses += r.misses;
            stats.avg_level += r.final_level as f32;
        }

        let resolved = summary.goals + summary.saves + summary.misses;
        summary.goal_rate = rate(summary.goals, resolved);
        summary.save_rate = rate(summary.saves, resolved);
        summary.miss_rate = rate(summary.misses, resolved);
        if summary.matches > 0 {
            summary.avg_score = score_sum as f32 / summary.matches as f32;
            summary.avg_level = level_sum as f32 / summary.matches as f32;
        }
        for stats in summary.by_difficulty.values_mut() {
            stats.goal_rate = rate(stats.goals, stats.goals + stats.saves + stats.misses);
            stats.avg_level /= stats.matches.max(1) as f32;
        }
        summary
    }

    /// Format as a human-readable table
    pub fn format_table(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} matches, {} shots: {:.1}% goals, {:.1}% saved, {:.1}% missed\n",
            self.matches,
            self.shots,
            self.goal_rate * 100.0,
            self.save_rate * 100.0,
            self.miss_rate * 100.0
        ));
        out.push_str(&format!(
            "Average score {:.1}, average level {:.1}, best level {}, failed {}\n",
            self.avg_score, self.avg_level, self.best_level, self.levels_failed
        ));
        if self.by_difficulty.len() > 1 {
            out.push_str("\nDifficulty  Matches  Goal%   AvgLevel\n");
            for (difficulty, stats) in &self.by_difficulty {
                out.push_str(&format!(
                    "{:>10}  {:>7}  {:>5.1}  {:>8.1}\n",
                    difficulty,
                    stats.matches,
                    stats.goal_rate * 100.0,
                    stats.avg_level
                ));
            }
        }
        out
    }
}
