//! Inputs delivered by the input layer

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// A shot released after the charge phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotInput {
    /// Aim, each axis in [-1, 1] (+x right, +y up)
    pub direction: Vec2,
    /// Charge in [0, 1]
    pub power: f32,
}

impl ShotInput {
    /// Build a shot with aim and power clamped to their ranges
    pub fn new(direction: Vec2, power: f32) -> Self {
        Self {
            direction: direction.clamp(Vec2::splat(-1.0), Vec2::ONE),
            power: power.clamp(0.0, 1.0),
        }
    }
}

/// Goalkeeper dive keys in save mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiveInput {
    Left,
    Right,
    Up,
    Down,
}

impl DiveInput {
    pub const ALL: [DiveInput; 4] = [DiveInput::Left, DiveInput::Right, DiveInput::Up, DiveInput::Down];

    /// Dive direction for this key
    pub fn direction(&self) -> Vec2 {
        match self {
            DiveInput::Left => Vec2::new(-1.0, 0.0),
            DiveInput::Right => Vec2::new(1.0, 0.0),
            DiveInput::Up => Vec2::new(0.0, 0.5),
            DiveInput::Down => Vec2::new(0.0, -0.2),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiveInput::Left => "left",
            DiveInput::Right => "right",
            DiveInput::Up => "up",
            DiveInput::Down => "down",
        }
    }

    /// Parse a key name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shot_input_clamps() {
        let shot = ShotInput::new(Vec2::new(2.0, -3.0), 1.5);
        assert_eq!(shot.direction, Vec2::new(1.0, -1.0));
        assert_eq!(shot.power, 1.0);
    }

    #[test]
    fn test_dive_keys() {
        assert_eq!(DiveInput::from_name("LEFT"), Some(DiveInput::Left));
        assert_eq!(DiveInput::from_name("sideways"), None);
        assert_eq!(DiveInput::Up.direction(), Vec2::new(0.0, 0.5));
        assert_eq!(DiveInput::Down.direction(), Vec2::new(0.0, -0.2));
    }
}
