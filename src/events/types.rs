//! Event type definitions

use serde::{Deserialize, Serialize};

use crate::game::{GameOverReason, Phase};
use crate::scoring::ShotOutcome;
use crate::settings::GameMode;

/// Everything the match reports while it runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    // === Session Events ===
    /// Log session opened
    SessionStart {
        session_id: String, // UUID v4
        timestamp: String,  // RFC 3339
    },

    // === Match Events ===
    MatchStart {
        mode: GameMode,
        difficulty: u32,
        country: String,
        seed: u64,
    },
    PhaseChange {
        from: Phase,
        to: Phase,
    },
    /// Save-mode countdown; 0 means the shot is on its way
    Countdown { remaining: u32 },

    // === Shot Events ===
    ShotTaken {
        direction: (f32, f32),
        power: f32,
        automatic: bool,
    },
    KeeperDive {
        direction: (f32, f32),
        target: (f32, f32, f32),
        player_controlled: bool,
    },
    ShotResolved {
        outcome: ShotOutcome,
        ball: (f32, f32, f32),
    },
    Goal {
        score: u32,
        level_goals: u32,
    },

    // === Level Events ===
    LevelComplete { level: u32 },
    LevelAdvance {
        level: u32,
        keeper_difficulty: u32,
    },
    GameOver {
        reason: GameOverReason,
        score: u32,
        level: u32,
    },
    RestartLevel { level: u32 },
    NewGame,
    Disposed,
}

impl GameEvent {
    /// Short code used in compact logs and scenario expectations
    pub fn type_code(&self) -> &'static str {
        match self {
            GameEvent::SessionStart { .. } => "SE",
            GameEvent::MatchStart { .. } => "MS",
            GameEvent::PhaseChange { .. } => "PC",
            GameEvent::Countdown { .. } => "CD",
            GameEvent::ShotTaken { .. } => "ST",
            GameEvent::KeeperDive { .. } => "KD",
            GameEvent::ShotResolved { .. } => "SR",
            GameEvent::Goal { .. } => "G",
            GameEvent::LevelComplete { .. } => "LC",
            GameEvent::LevelAdvance { .. } => "LA",
            GameEvent::GameOver { .. } => "GO",
            GameEvent::RestartLevel { .. } => "RL",
            GameEvent::NewGame => "NG",
            GameEvent::Disposed => "DX",
        }
    }

    /// Event name as written in scenario files
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::SessionStart { .. } => "SessionStart",
            GameEvent::MatchStart { .. } => "MatchStart",
            GameEvent::PhaseChange { .. } => "PhaseChange",
            GameEvent::Countdown { .. } => "Countdown",
            GameEvent::ShotTaken { .. } => "ShotTaken",
            GameEvent::KeeperDive { .. } => "KeeperDive",
            GameEvent::ShotResolved { .. } => "ShotResolved",
            GameEvent::Goal { .. } => "Goal",
            GameEvent::LevelComplete { .. } => "LevelComplete",
            GameEvent::LevelAdvance { .. } => "LevelAdvance",
            GameEvent::GameOver { .. } => "GameOver",
            GameEvent::RestartLevel { .. } => "RestartLevel",
            GameEvent::NewGame => "NewGame",
            GameEvent::Disposed => "Disposed",
        }
    }
}
