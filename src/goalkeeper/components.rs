//! Goalkeeper state

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Who decides where the keeper dives. Chosen when the keeper is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeeperControl {
    /// Keeper reads the shot itself, accuracy scaled by difficulty
    #[default]
    Ai,
    /// Keeper dives exactly where the player points
    Player,
}

/// Idle anticipation: an occasional lean toward one side. Cosmetic only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Anticipation {
    pub active: bool,
    /// Lateral lean in meters (signed)
    pub lean: f32,
    /// Seconds since the last anticipation roll
    pub timer: f32,
    /// Idle clock driving the sway/bob curves
    pub clock: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Goalkeeper {
    /// Position used for save checks
    pub position: Vec3,
    pub initial_position: Vec3,
    pub is_diving: bool,
    /// Dive completion in [0, 1]
    pub dive_progress: f32,
    /// Base dive progress per physics step
    pub dive_speed: f32,
    pub dive_direction: Vec2,
    pub target_position: Vec3,
    /// Level-adjusted difficulty in [0, 100]
    pub difficulty: u32,
    pub control: KeeperControl,
    pub anticipation: Anticipation,
}

impl Goalkeeper {
    pub fn new(difficulty: u32, control: KeeperControl) -> Self {
        let mut keeper = Self {
            position: KEEPER_SPAWN,
            initial_position: KEEPER_SPAWN,
            is_diving: false,
            dive_progress: 0.0,
            dive_speed: KEEPER_BASE_DIVE_SPEED,
            dive_direction: Vec2::ZERO,
            target_position: KEEPER_SPAWN,
            difficulty: 0,
            control,
            anticipation: Anticipation::default(),
        };
        keeper.set_difficulty(difficulty);
        keeper
    }

    /// Update difficulty and the dive speed derived from it
    pub fn set_difficulty(&mut self, difficulty: u32) {
        self.difficulty = difficulty.min(MAX_DIFFICULTY);
        self.dive_speed = KEEPER_BASE_DIVE_SPEED * (1.0 + self.difficulty as f32 / 200.0);
    }

    /// Faster dives at higher difficulty
    pub fn reflex_modifier(&self) -> f32 {
        self.difficulty as f32 / 100.0
    }

    pub fn is_player_controlled(&self) -> bool {
        self.control == KeeperControl::Player
    }

    /// Back to idle in front of the goal
    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.target_position = self.initial_position;
        self.is_diving = false;
        self.dive_progress = 0.0;
        self.dive_direction = Vec2::ZERO;
        self.anticipation.active = false;
        self.anticipation.lean = 0.0;
    }
}
