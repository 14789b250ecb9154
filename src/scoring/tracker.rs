//! Per-shot tracking: decides when and how a shot is classified

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ball::Ball;
use crate::scoring::resolver::{GoalBounds, ShotOutcome, is_goal, is_saved, resolve};

/// When a save is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveClassification {
    /// Checked every step: any step with the ball in the goal and out of
    /// reach is a goal. A ball that stops after being inside the goal within
    /// reach counts as saved, otherwise missed.
    #[default]
    Continuous,
    /// The first step the ball is inside the goal decides the shot: within
    /// reach it is saved on the spot, otherwise it is a goal.
    FirstContact,
}

/// Memory of the shot in flight
#[derive(Debug, Clone, PartialEq)]
pub struct ShotTracker {
    pub policy: SaveClassification,
    /// Ball was inside the goal while the keeper could reach it
    pub intercepted: bool,
    /// Ball has been inside the goal bounds at least once
    pub entered_goal: bool,
    outcome: ShotOutcome,
}

impl ShotTracker {
    pub fn new(policy: SaveClassification) -> Self {
        Self {
            policy,
            intercepted: false,
            entered_goal: false,
            outcome: ShotOutcome::InProgress,
        }
    }

    /// Forget the previous shot
    pub fn begin(&mut self) {
        *self = Self::new(self.policy);
    }

    pub fn outcome(&self) -> ShotOutcome {
        self.outcome
    }

    /// Classify the ball after a physics step. Once a terminal outcome is
    /// reached it sticks until `begin`.
    pub fn observe(
        &mut self,
        ball: &Ball,
        bounds: &GoalBounds,
        keeper_position: Vec3,
        difficulty: u32,
    ) -> ShotOutcome {
        if self.outcome.is_terminal() {
            return self.outcome;
        }

        let in_goal = is_goal(ball, bounds);
        let in_reach = is_saved(ball, keeper_position, difficulty);

        let outcome = match self.policy {
            SaveClassification::Continuous => {
                if in_goal && in_reach {
                    self.intercepted = true;
                }
                match resolve(ball, bounds, keeper_position, difficulty) {
                    ShotOutcome::Missed if self.intercepted => ShotOutcome::Saved,
                    other => other,
                }
            }
            SaveClassification::FirstContact => {
                if in_goal && !self.entered_goal {
                    if in_reach {
                        self.intercepted = true;
                        ShotOutcome::Saved
                    } else {
                        ShotOutcome::Goal
                    }
                } else if !ball.is_moving {
                    ShotOutcome::Missed
                } else {
                    ShotOutcome::InProgress
                }
            }
        };
        self.entered_goal |= in_goal;

        self.outcome = outcome;
        outcome
    }
}

impl Default for ShotTracker {
    fn default() -> Self {
        Self::new(SaveClassification::default())
    }
}
