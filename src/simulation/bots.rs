//! Simulation bots - stand-ins for the human player
//!
//! The shooter aims at random and holds the power meter for a random charge
//! time. The keeper waits out a reaction delay, then guesses a dive from the
//! ball's flight (or at random when it misreads).

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ball::Ball;
use crate::game::Phase;
use crate::shooting::{DiveInput, PowerMeter, ShotInput};

/// Sideways speed below which the keeper bot reads the shot as central
const CENTRAL_SHOT_SPEED: f32 = 2.0;
/// Vertical speed above which a central shot is read as high
const HIGH_SHOT_SPEED: f32 = 4.0;

/// Bot skill parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotProfile {
    /// Aim stays within ±this horizontally
    pub aim_spread: f32,
    /// Highest vertical aim
    pub aim_height: f32,
    /// Minimum time holding the power meter (seconds)
    pub charge_min: f32,
    /// Maximum time holding the power meter (seconds)
    pub charge_max: f32,
    /// Keeper bot delay before committing to a dive
    pub keeper_reaction_ms: u32,
    /// Chance the keeper bot reads the ball's direction correctly
    pub keeper_read_accuracy: f32,
}

impl Default for BotProfile {
    fn default() -> Self {
        Self {
            aim_spread: 0.4,
            aim_height: 0.6,
            charge_min: 0.2,
            charge_max: 0.6,
            keeper_reaction_ms: 250,
            keeper_read_accuracy: 0.6,
        }
    }
}

fn range(rng: &mut impl Rng, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if hi - lo <= f32::EPSILON {
        lo
    } else {
        rng.gen_range(lo..hi)
    }
}

/// Shooter bot: aim, charge, release
#[derive(Debug, Clone, Default)]
pub struct ShooterBot {
    meter: PowerMeter,
    aim: Vec2,
    /// Charge time left before release
    hold_remaining: f32,
}

impl ShooterBot {
    pub fn is_charging(&self) -> bool {
        self.meter.charging
    }

    /// Advance one fixed step. Returns a shot when the bot releases.
    pub fn step(
        &mut self,
        profile: &BotProfile,
        phase: Phase,
        dt: f32,
        rng: &mut impl Rng,
    ) -> Option<ShotInput> {
        if phase != Phase::Ready {
            if self.meter.charging {
                self.meter.release();
            }
            return None;
        }

        if !self.meter.charging {
            let spread = profile.aim_spread.abs().min(1.0);
            self.aim = Vec2::new(
                range(rng, -spread, spread),
                range(rng, 0.0, profile.aim_height.clamp(0.0, 1.0)),
            );
            self.hold_remaining = range(rng, profile.charge_min.max(0.0), profile.charge_max.max(0.0));
            self.meter.start();
            return None;
        }

        self.meter.step();
        self.hold_remaining -= dt;
        if self.hold_remaining <= 0.0 {
            let power = self.meter.release();
            return Some(ShotInput::new(self.aim, power));
        }
        None
    }
}

/// Keeper bot: one dive per shot, after its reaction delay
#[derive(Debug, Clone, Default)]
pub struct KeeperBot {
    waited: f32,
    committed: bool,
}

impl KeeperBot {
    /// Advance one fixed step. Returns a dive when the bot commits.
    pub fn step(
        &mut self,
        profile: &BotProfile,
        phase: Phase,
        ball: &Ball,
        dt: f32,
        rng: &mut impl Rng,
    ) -> Option<DiveInput> {
        if phase != Phase::Saving {
            self.waited = 0.0;
            self.committed = false;
            return None;
        }
        if self.committed {
            return None;
        }
        self.waited += dt;
        if self.waited < profile.keeper_reaction_ms as f32 / 1000.0 {
            return None;
        }

        self.committed = true;
        if rng.gen_range(0.0..1.0) < profile.keeper_read_accuracy {
            Some(read_flight(ball))
        } else {
            Some(DiveInput::ALL[rng.gen_range(0..DiveInput::ALL.len())])
        }
    }
}

/// Dive key matching the ball's flight
pub fn read_flight(ball: &Ball) -> DiveInput {
    let v = ball.velocity;
    if v.x.abs() > CENTRAL_SHOT_SPEED {
        if v.x < 0.0 {
            DiveInput::Left
        } else {
            DiveInput::Right
        }
    } else if v.y > HIGH_SHOT_SPEED {
        DiveInput::Up
    } else {
        DiveInput::Down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_shooter_releases_after_charge() {
        let profile = BotProfile {
            charge_min: 0.5,
            charge_max: 0.5,
            ..Default::default()
        };
        let mut bot = ShooterBot::default();
        let mut rng = StdRng::seed_from_u64(1);

        let mut shot = None;
        let mut steps = 0;
        while shot.is_none() && steps < 100 {
            shot = bot.step(&profile, Phase::Ready, DT, &mut rng);
            steps += 1;
        }
        let shot = shot.unwrap();
        // One step to pick the aim, then about 30 steps of charge
        assert!((30..=33).contains(&steps), "steps={}", steps);
        assert!(shot.power > 0.5 && shot.power < 0.7, "power={}", shot.power);
        assert!(shot.direction.x.abs() <= profile.aim_spread);
        assert!(!bot.is_charging());
    }

    #[test]
    fn test_shooter_waits_outside_ready() {
        let mut bot = ShooterBot::default();
        let mut rng = StdRng::seed_from_u64(2);
        bot.step(&BotProfile::default(), Phase::Ready, DT, &mut rng);
        assert!(bot.is_charging());
        assert_eq!(bot.step(&BotProfile::default(), Phase::Shooting, DT, &mut rng), None);
        assert!(!bot.is_charging());
    }

    #[test]
    fn test_keeper_dives_once_after_reaction() {
        let profile = BotProfile {
            keeper_reaction_ms: 100,
            keeper_read_accuracy: 1.0,
            ..Default::default()
        };
        let mut ball = Ball::default();
        ball.velocity = Vec3::new(-10.0, 5.0, -40.0);
        let mut bot = KeeperBot::default();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..5 {
            assert_eq!(bot.step(&profile, Phase::Saving, &ball, DT, &mut rng), None);
        }
        let mut dive = None;
        for _ in 0..3 {
            dive = dive.or(bot.step(&profile, Phase::Saving, &ball, DT, &mut rng));
        }
        assert_eq!(dive, Some(DiveInput::Left));
        assert_eq!(bot.step(&profile, Phase::Saving, &ball, DT, &mut rng), None);

        // Next shot re-arms the bot
        bot.step(&profile, Phase::Ready, &ball, DT, &mut rng);
        assert!(!bot.committed);
    }

    #[test]
    fn test_read_flight() {
        let mut ball = Ball::default();
        ball.velocity = Vec3::new(8.0, 2.0, -50.0);
        assert_eq!(read_flight(&ball), DiveInput::Right);
        ball.velocity = Vec3::new(0.5, 12.0, -50.0);
        assert_eq!(read_flight(&ball), DiveInput::Up);
        ball.velocity = Vec3::new(0.5, 1.0, -50.0);
        assert_eq!(read_flight(&ball), DiveInput::Down);
    }
}
