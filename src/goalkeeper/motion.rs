//! Goalkeeper motion: dive interpolation, ball tracking and idle sway

use bevy::prelude::*;
use rand::Rng;

use crate::constants::*;
use crate::goalkeeper::components::Goalkeeper;
use crate::kinematics::{ease_out_quad, signed_unit, unit};

impl Goalkeeper {
    /// Advance one physics step.
    ///
    /// While diving, progress grows by the dive speed (boosted by reflexes)
    /// and the keeper moves along an ease-out curve from the initial spot to
    /// the dive target. While idle only the cosmetic anticipation state
    /// changes; `position` is left alone.
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        if self.is_diving {
            self.dive_progress =
                (self.dive_progress + self.dive_speed * (1.0 + self.reflex_modifier())).min(1.0);

            let eased = ease_out_quad(self.dive_progress);
            self.position.x =
                self.initial_position.x + (self.target_position.x - self.initial_position.x) * eased;
            self.position.y =
                self.initial_position.y + (self.target_position.y - self.initial_position.y) * eased;

            // Low dives step out toward the kicker
            if self.dive_direction.y < 0.0 {
                self.position.z = self.initial_position.z
                    + self.dive_direction.y.abs() * KEEPER_LOW_DIVE_ADVANCE * eased;
            }
        } else {
            self.update_anticipation(dt, rng);
        }
    }

    fn update_anticipation(&mut self, dt: f32, rng: &mut impl Rng) {
        let anticipation = &mut self.anticipation;
        anticipation.clock += dt.max(0.0);
        anticipation.timer += dt.max(0.0);

        if anticipation.timer < KEEPER_ANTICIPATION_INTERVAL {
            return;
        }
        anticipation.timer = 0.0;

        // 0-50% chance to lean, based on difficulty
        let difficulty = self.difficulty as f32;
        if unit(rng) < difficulty / 200.0 {
            anticipation.active = true;
            anticipation.lean = signed_unit(rng) * (difficulty / 100.0);
        } else {
            anticipation.active = false;
            anticipation.lean = 0.0;
        }
    }

    /// Drift toward the ball's line before committing to a dive.
    /// AI keepers only; ignored mid-dive.
    pub fn track_ball(&mut self, ball_position: Vec3) {
        if self.is_diving || self.is_player_controlled() {
            return;
        }
        let tracking = KEEPER_TRACKING_MAX.min(self.difficulty as f32 / 1000.0);
        let target_x = (ball_position.x * 0.2).clamp(-KEEPER_LATERAL_LIMIT, KEEPER_LATERAL_LIMIT);
        self.position.x += (target_x - self.position.x) * tracking;
    }

    /// Offset to draw the keeper at while idle (sway, bob and lean).
    /// Never used for save checks.
    pub fn display_offset(&self) -> Vec3 {
        if self.is_diving {
            return Vec3::ZERO;
        }
        let anticipation = &self.anticipation;
        let mut sway = (anticipation.clock).sin() * KEEPER_IDLE_SWAY;
        if anticipation.active {
            sway += anticipation.lean;
        }
        let x = (self.position.x + sway).clamp(-KEEPER_LATERAL_LIMIT, KEEPER_LATERAL_LIMIT)
            - self.position.x;
        let y = (anticipation.clock * 1.5).sin() * 0.05;
        Vec3::new(x, y, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goalkeeper::KeeperControl;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_dive_progress_monotonic_and_capped() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut keeper = Goalkeeper::new(100, KeeperControl::Player);
        keeper.dive(Vec2::new(1.0, 0.0), &mut rng);

        let mut last = 0.0;
        for _ in 0..100 {
            keeper.update(DT, &mut rng);
            assert!(keeper.dive_progress >= last);
            assert!(keeper.dive_progress <= 1.0);
            last = keeper.dive_progress;
        }
        assert_eq!(keeper.dive_progress, 1.0);
        assert!((keeper.position.x - keeper.target_position.x).abs() < 1e-5);
    }

    #[test]
    fn test_dive_step_size_matches_difficulty() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut keeper = Goalkeeper::new(100, KeeperControl::Player);
        keeper.dive(Vec2::new(-1.0, 0.0), &mut rng);
        keeper.update(DT, &mut rng);
        // 0.05 * (1 + 100/200) * (1 + 1)
        assert!((keeper.dive_progress - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_low_dive_steps_forward() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut keeper = Goalkeeper::new(50, KeeperControl::Player);
        keeper.dive(Vec2::new(0.0, -0.2), &mut rng);
        for _ in 0..60 {
            keeper.update(DT, &mut rng);
        }
        assert!(keeper.position.z > keeper.initial_position.z);
    }

    #[test]
    fn test_idle_sway_does_not_move_position() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut keeper = Goalkeeper::new(100, KeeperControl::Ai);
        for _ in 0..600 {
            keeper.update(DT, &mut rng);
        }
        assert_eq!(keeper.position, keeper.initial_position);
        let offset = keeper.display_offset();
        assert!((keeper.position.x + offset.x).abs() <= KEEPER_LATERAL_LIMIT + 1e-5);
    }

    #[test]
    fn test_tracking_moves_ai_only() {
        let mut ai = Goalkeeper::new(50, KeeperControl::Ai);
        ai.track_ball(Vec3::new(10.0, 0.5, 5.0));
        assert!(ai.position.x > 0.0);

        let mut player = Goalkeeper::new(50, KeeperControl::Player);
        player.track_ball(Vec3::new(10.0, 0.5, 5.0));
        assert_eq!(player.position.x, 0.0);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut keeper = Goalkeeper::new(70, KeeperControl::Ai);
        keeper.dive(Vec2::new(0.5, 0.5), &mut rng);
        for _ in 0..10 {
            keeper.update(DT, &mut rng);
        }
        keeper.reset();
        assert!(!keeper.is_diving);
        assert_eq!(keeper.dive_progress, 0.0);
        assert_eq!(keeper.position, keeper.initial_position);
    }
}
