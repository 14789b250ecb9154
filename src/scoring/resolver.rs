//! Shot resolver: goal bounds containment and keeper reach

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ball::Ball;
use crate::constants::*;

/// The box that counts as "in the goal": between the posts, under the bar
/// and past the goal line (toward -z).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalBounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub back: f32,
}

impl Default for GoalBounds {
    fn default() -> Self {
        Self {
            left: -GOAL_WIDTH / 2.0,
            right: GOAL_WIDTH / 2.0,
            top: GOAL_HEIGHT,
            back: -GOAL_DEPTH,
        }
    }
}

impl GoalBounds {
    /// Strict containment of a point
    pub fn contains(&self, point: Vec3) -> bool {
        point.x > self.left && point.x < self.right && point.y < self.top && point.z < self.back
    }
}

/// Classification of the shot in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotOutcome {
    Goal,
    Saved,
    Missed,
    InProgress,
}

impl ShotOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ShotOutcome::InProgress)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShotOutcome::Goal => "goal",
            ShotOutcome::Saved => "saved",
            ShotOutcome::Missed => "missed",
            ShotOutcome::InProgress => "in_progress",
        }
    }
}

/// Keeper reach around its center. Easier matches get a bigger keeper.
pub fn saving_radius(difficulty: u32) -> f32 {
    let difficulty = difficulty.min(MAX_DIFFICULTY);
    SAVE_RADIUS_BASE + (MAX_DIFFICULTY - difficulty) as f32 / SAVE_RADIUS_DIVISOR
}

pub fn is_goal(ball: &Ball, bounds: &GoalBounds) -> bool {
    bounds.contains(ball.position)
}

pub fn is_saved(ball: &Ball, keeper_position: Vec3, difficulty: u32) -> bool {
    ball.position.distance(keeper_position) < saving_radius(difficulty)
}

/// Classify the ball for this step.
///
/// A ball inside the goal and out of the keeper's reach is a goal. A ball
/// that has stopped without scoring is `Missed` here; telling a save apart
/// needs the shot's history, which `ShotTracker` keeps.
pub fn resolve(ball: &Ball, bounds: &GoalBounds, keeper_position: Vec3, difficulty: u32) -> ShotOutcome {
    if is_goal(ball, bounds) && !is_saved(ball, keeper_position, difficulty) {
        ShotOutcome::Goal
    } else if !ball.is_moving {
        ShotOutcome::Missed
    } else {
        ShotOutcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_at(position: Vec3, moving: bool) -> Ball {
        let mut ball = Ball::default();
        ball.position = position;
        ball.is_moving = moving;
        ball
    }

    #[test]
    fn test_saving_radius_range() {
        assert_eq!(saving_radius(100), 3.0);
        assert_eq!(saving_radius(0), 8.0);
        assert_eq!(saving_radius(200), 3.0);
    }

    #[test]
    fn test_goal_needs_strict_containment() {
        let bounds = GoalBounds::default();
        assert!(bounds.contains(Vec3::new(0.0, 1.0, -2.5)));
        assert!(!bounds.contains(Vec3::new(bounds.right, 1.0, -2.5)));
        assert!(!bounds.contains(Vec3::new(0.0, bounds.top, -2.5)));
        assert!(!bounds.contains(Vec3::new(0.0, 1.0, bounds.back)));
    }

    #[test]
    fn test_goal_when_out_of_reach() {
        let bounds = GoalBounds::default();
        let ball = ball_at(Vec3::new(3.0, 0.5, -6.0), true);
        let keeper = Vec3::new(-2.0, 1.0, -0.5);
        assert_eq!(resolve(&ball, &bounds, keeper, 100), ShotOutcome::Goal);
    }

    #[test]
    fn test_in_reach_is_not_goal() {
        let bounds = GoalBounds::default();
        let ball = ball_at(Vec3::new(1.0, 1.0, -2.2), true);
        let keeper = Vec3::new(0.5, 1.0, -0.5);
        assert_eq!(resolve(&ball, &bounds, keeper, 100), ShotOutcome::InProgress);
    }

    #[test]
    fn test_stopped_outside_is_missed() {
        let bounds = GoalBounds::default();
        let ball = ball_at(Vec3::new(9.0, BALL_RADIUS, -5.0), false);
        assert_eq!(resolve(&ball, &bounds, KEEPER_SPAWN, 50), ShotOutcome::Missed);
    }

    #[test]
    fn test_goal_iff_inside_and_beyond_radius() {
        let bounds = GoalBounds::default();
        let keeper = KEEPER_SPAWN;
        for difficulty in [0, 25, 50, 75, 100] {
            for xi in -10..=10 {
                for zi in 0..12 {
                    let position = Vec3::new(xi as f32 * 0.45, 1.0, -zi as f32 * 1.1);
                    let ball = ball_at(position, true);
                    let expected = bounds.contains(position)
                        && position.distance(keeper) >= saving_radius(difficulty);
                    let outcome = resolve(&ball, &bounds, keeper, difficulty);
                    assert_eq!(outcome == ShotOutcome::Goal, expected, "{:?} d={}", position, difficulty);
                }
            }
        }
    }
}
