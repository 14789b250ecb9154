//! Match counters and the rules derived from the current level

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::kinematics::signed_unit;

/// Where the match is in its turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for a shot (or counting down to an automatic one)
    #[default]
    Ready,
    /// Player shot in flight against the AI keeper
    Shooting,
    /// Automatic shot in flight against the player keeper
    Saving,
    /// Goal scored, holding before the next shot
    Celebrating,
    /// Enough goals for the level, moving on
    LevelComplete,
    /// Terminal until restart_level or new_game
    GameOver,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Ready => "Ready",
            Phase::Shooting => "Shooting",
            Phase::Saving => "Saving",
            Phase::Celebrating => "Celebrating",
            Phase::LevelComplete => "LevelComplete",
            Phase::GameOver => "GameOver",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            Phase::Ready,
            Phase::Shooting,
            Phase::Saving,
            Phase::Celebrating,
            Phase::LevelComplete,
            Phase::GameOver,
        ]
        .into_iter()
        .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }

    /// A shot is in flight and the resolver runs every step
    pub fn is_shot_active(&self) -> bool {
        matches!(self, Phase::Shooting | Phase::Saving)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Ran out of shots before reaching the level's goal target
    LevelFailed,
    /// Cleared the final level
    AllLevelsComplete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    /// Goals across the whole game
    pub score: u32,
    /// Shots taken in the current level
    pub shots_taken: u32,
    pub max_shots: u32,
    pub current_level: u32,
    pub max_level: u32,
    pub level_goals: u32,
    pub level_goals_required: u32,
    pub phase: Phase,
    pub game_over: Option<GameOverReason>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self {
            score: 0,
            shots_taken: 0,
            max_shots: MAX_SHOTS,
            current_level: 1,
            max_level: MAX_LEVEL,
            level_goals: 0,
            level_goals_required: LEVEL_GOALS_REQUIRED,
            phase: Phase::Ready,
            game_over: None,
        }
    }
}

impl MatchState {
    pub fn goals_needed(&self) -> u32 {
        self.level_goals_required.saturating_sub(self.level_goals)
    }

    pub fn level_target_reached(&self) -> bool {
        self.level_goals >= self.level_goals_required
    }

    pub fn out_of_shots(&self) -> bool {
        self.shots_taken >= self.max_shots
    }

    pub fn is_final_level(&self) -> bool {
        self.current_level >= self.max_level
    }

    /// Counters for a fresh attempt at the current level. Score is kept.
    pub fn reset_level_counters(&mut self) {
        self.shots_taken = 0;
        self.level_goals = 0;
        self.game_over = None;
    }
}

/// Keeper difficulty for a level: base plus 5 per level beyond the first
pub fn keeper_difficulty(base: u32, level: u32) -> u32 {
    (base + level.saturating_sub(1) * DIFFICULTY_PER_LEVEL).min(MAX_DIFFICULTY)
}

/// Delay before the AI keeper reacts to a player shot
pub fn reaction_time_ms(level: u32) -> u32 {
    REACTION_TIME_BASE_MS
        .saturating_sub(level.saturating_mul(REACTION_TIME_PER_LEVEL_MS))
        .max(REACTION_TIME_MIN_MS)
}

/// The keeper's read of the shot: the true aim plus jitter that shrinks as
/// levels go up
pub fn read_shot_direction(direction: Vec2, level: u32, rng: &mut impl Rng) -> Vec2 {
    let spread = 1.0 - level.min(MAX_LEVEL) as f32 / 100.0;
    Vec2::new(
        direction.x + signed_unit(rng) * REACTION_JITTER_X * spread,
        direction.y + signed_unit(rng) * REACTION_JITTER_Y * spread,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_keeper_difficulty_per_level() {
        assert_eq!(keeper_difficulty(50, 1), 50);
        assert_eq!(keeper_difficulty(50, 2), 55);
        assert_eq!(keeper_difficulty(50, 11), 100);
        assert_eq!(keeper_difficulty(90, 40), 100);
        assert_eq!(keeper_difficulty(10, 0), 10);
    }

    #[test]
    fn test_reaction_time_floor() {
        assert_eq!(reaction_time_ms(1), 298);
        assert_eq!(reaction_time_ms(50), 200);
        assert_eq!(reaction_time_ms(100), 100);
        assert_eq!(reaction_time_ms(u32::MAX), 100);
    }

    #[test]
    fn test_read_jitter_shrinks_with_level() {
        let mut rng = StdRng::seed_from_u64(8);
        let aim = Vec2::new(0.3, 0.4);
        for _ in 0..200 {
            let read = read_shot_direction(aim, 1, &mut rng);
            assert!((read.x - aim.x).abs() <= 0.2);
            assert!((read.y - aim.y).abs() <= 0.15);
        }
        assert_eq!(read_shot_direction(aim, 100, &mut rng), aim);
    }

    #[test]
    fn test_counters() {
        let mut state = MatchState::default();
        assert_eq!(state.goals_needed(), 3);
        state.level_goals = 3;
        state.shots_taken = 5;
        assert!(state.level_target_reached());
        assert!(state.out_of_shots());
        state.score = 7;
        state.reset_level_counters();
        assert_eq!(state.shots_taken, 0);
        assert_eq!(state.level_goals, 0);
        assert_eq!(state.score, 7);
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::from_name("levelcomplete"), Some(Phase::LevelComplete));
        assert!(Phase::Saving.is_shot_active());
        assert!(!Phase::Celebrating.is_shot_active());
    }
}
