//! Automatic shots taken against a player-controlled keeper

use bevy::prelude::*;
use rand::Rng;

use crate::constants::*;
use crate::kinematics::{signed_unit, unit};
use crate::shooting::input::ShotInput;

/// Shot power for automatic shots: harder levels and difficulties shoot harder
pub fn auto_shot_power(level: u32, difficulty: u32) -> f32 {
    let level = level.min(MAX_LEVEL) as f32;
    let difficulty = difficulty.min(MAX_DIFFICULTY) as f32;
    (AUTO_SHOT_BASE_POWER
        + level / 100.0 * AUTO_SHOT_LEVEL_POWER
        + difficulty / 100.0 * AUTO_SHOT_DIFFICULTY_POWER)
        .min(1.0)
}

/// Random aim anywhere in the lower goal, fixed power for the level
pub fn auto_shot(level: u32, difficulty: u32, rng: &mut impl Rng) -> ShotInput {
    let direction = Vec2::new(signed_unit(rng) * AUTO_SHOT_SPREAD_X, unit(rng) * AUTO_SHOT_MAX_Y);
    ShotInput::new(direction, auto_shot_power(level, difficulty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_power_scales_with_level_and_difficulty() {
        assert!((auto_shot_power(0, 0) - 0.7).abs() < 1e-6);
        assert!((auto_shot_power(1, 0) - 0.702).abs() < 1e-6);
        assert!((auto_shot_power(50, 50) - 0.85).abs() < 1e-6);
        assert!((auto_shot_power(100, 100) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_aim_within_spread() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let shot = auto_shot(3, 40, &mut rng);
            assert!(shot.direction.x.abs() <= AUTO_SHOT_SPREAD_X);
            assert!(shot.direction.y >= 0.0 && shot.direction.y <= AUTO_SHOT_MAX_Y);
        }
    }
}
