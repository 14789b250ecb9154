//! Ball state

use bevy::prelude::*;

use crate::constants::*;

/// The match ball. Owned by the match; mutated only through `kick`,
/// `advance` and `reset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    /// True from kick until the ball comes to rest
    pub is_moving: bool,
    /// Accumulated rolling rotation (cosmetic)
    pub rotation: Quat,
    /// Where `reset` puts the ball
    pub spawn: Vec3,
}

impl Default for Ball {
    fn default() -> Self {
        Self::new(BALL_SPAWN)
    }
}

impl Ball {
    /// Ball at rest on `spawn`
    pub fn new(spawn: Vec3) -> Self {
        Self {
            position: spawn,
            velocity: Vec3::ZERO,
            radius: BALL_RADIUS,
            is_moving: false,
            rotation: Quat::IDENTITY,
            spawn,
        }
    }

    /// Back on the penalty spot, at rest
    pub fn reset(&mut self) {
        self.position = self.spawn;
        self.velocity = Vec3::ZERO;
        self.is_moving = false;
        self.rotation = Quat::IDENTITY;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// What happened to the ball during one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BallStep {
    /// Ball hit the ground hard enough to bounce
    pub bounced: bool,
    /// Ball came to rest this step
    pub stopped: bool,
}
