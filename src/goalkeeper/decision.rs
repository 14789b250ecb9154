//! Dive decisions - where the keeper goes when the shot is read

use bevy::prelude::*;
use rand::Rng;

use crate::constants::*;
use crate::goalkeeper::components::{Goalkeeper, KeeperControl};
use crate::kinematics::{clamp_length, signed_unit, unit};

/// Chosen dive: normalized direction and the point the keeper moves to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiveDecision {
    pub direction: Vec2,
    pub target: Vec3,
}

/// How far sideways a full-length dive reaches
pub fn dive_distance(difficulty: u32) -> f32 {
    KEEPER_BASE_DIVE_DISTANCE + difficulty.min(MAX_DIFFICULTY) as f32 / 100.0 * KEEPER_DIVE_DISTANCE_BONUS
}

/// Decide a dive for a shot heading in `shot_direction`.
///
/// A player-controlled keeper dives exactly along the input. The AI reads
/// the shot correctly with probability `difficulty / 100`, adding less noise
/// the better it is; otherwise it commits to the opposite side.
pub fn decide_dive(
    shot_direction: Vec2,
    difficulty: u32,
    control: KeeperControl,
    initial_position: Vec3,
    rng: &mut impl Rng,
) -> DiveDecision {
    let difficulty = difficulty.min(MAX_DIFFICULTY);

    let raw = match control {
        KeeperControl::Player => shot_direction,
        KeeperControl::Ai => {
            let accuracy = difficulty as f32 / 100.0;
            if unit(rng) < accuracy {
                let variation = (1.0 - accuracy) * KEEPER_READ_NOISE;
                Vec2::new(
                    shot_direction.x + signed_unit(rng) * variation,
                    shot_direction.y + (unit(rng) - 0.5) * variation,
                )
            } else {
                Vec2::new(
                    -shot_direction.x + (unit(rng) - 0.5) * KEEPER_MISREAD_NOISE,
                    (shot_direction.y + unit(rng) * 0.4 - 0.6).max(0.0),
                )
            }
        }
    };

    let direction = clamp_length(raw, 1.0);
    let reach = dive_distance(difficulty);
    let target = Vec3::new(
        initial_position.x + direction.x * reach,
        (initial_position.y + direction.y * KEEPER_VERTICAL_REACH).max(KEEPER_MIN_HEIGHT),
        initial_position.z,
    );

    DiveDecision { direction, target }
}

impl Goalkeeper {
    /// Commit to a dive. Ignored while a dive is already in progress.
    /// Returns the decision when a new dive starts.
    pub fn dive(&mut self, shot_direction: Vec2, rng: &mut impl Rng) -> Option<DiveDecision> {
        if self.is_diving {
            return None;
        }

        let decision = decide_dive(
            shot_direction,
            self.difficulty,
            self.control,
            self.initial_position,
            rng,
        );
        self.is_diving = true;
        self.dive_progress = 0.0;
        self.dive_direction = decision.direction;
        self.target_position = decision.target;
        Some(decision)
    }
}
