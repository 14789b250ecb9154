//! Global physics tuning settings
//!
//! `GameplayTuning` is the serializable form stored in config; `PhysicsTweaks`
//! is the runtime resource every physics step reads.

use bevy::log::warn;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

fn default_ball_gravity() -> f32 {
    BALL_GRAVITY
}
fn default_ball_drag() -> f32 {
    BALL_DRAG
}
fn default_ball_bounce() -> f32 {
    BALL_BOUNCE
}
fn default_bounce_threshold() -> f32 {
    BALL_BOUNCE_THRESHOLD
}
fn default_stop_speed() -> f32 {
    BALL_STOP_SPEED
}
fn default_spin_factor() -> f32 {
    BALL_SPIN_FACTOR
}
fn default_kick_horizontal_scale() -> f32 {
    KICK_HORIZONTAL_SCALE
}
fn default_kick_vertical_scale() -> f32 {
    KICK_VERTICAL_SCALE
}
fn default_kick_forward_scale() -> f32 {
    KICK_FORWARD_SCALE
}
fn default_kick_noise_horizontal() -> f32 {
    KICK_NOISE_HORIZONTAL
}
fn default_kick_noise_vertical() -> f32 {
    KICK_NOISE_VERTICAL
}

/// Path to global gameplay tuning config
pub const GAMEPLAY_TUNING_FILE: &str = "config/gameplay_tuning.json";

/// Serializable tuning values stored in config. Missing fields fall back to
/// the compiled-in constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameplayTuning {
    #[serde(default = "default_ball_gravity")]
    pub ball_gravity: f32,
    #[serde(default = "default_ball_drag")]
    pub ball_drag: f32,
    #[serde(default = "default_ball_bounce")]
    pub ball_bounce: f32,
    #[serde(default = "default_bounce_threshold")]
    pub bounce_threshold: f32,
    #[serde(default = "default_stop_speed")]
    pub stop_speed: f32,
    #[serde(default = "default_spin_factor")]
    pub spin_factor: f32,
    #[serde(default = "default_kick_horizontal_scale")]
    pub kick_horizontal_scale: f32,
    #[serde(default = "default_kick_vertical_scale")]
    pub kick_vertical_scale: f32,
    #[serde(default = "default_kick_forward_scale")]
    pub kick_forward_scale: f32,
    #[serde(default = "default_kick_noise_horizontal")]
    pub kick_noise_horizontal: f32,
    #[serde(default = "default_kick_noise_vertical")]
    pub kick_noise_vertical: f32,
}

impl Default for GameplayTuning {
    fn default() -> Self {
        Self {
            ball_gravity: default_ball_gravity(),
            ball_drag: default_ball_drag(),
            ball_bounce: default_ball_bounce(),
            bounce_threshold: default_bounce_threshold(),
            stop_speed: default_stop_speed(),
            spin_factor: default_spin_factor(),
            kick_horizontal_scale: default_kick_horizontal_scale(),
            kick_vertical_scale: default_kick_vertical_scale(),
            kick_forward_scale: default_kick_forward_scale(),
            kick_noise_horizontal: default_kick_noise_horizontal(),
            kick_noise_vertical: default_kick_noise_vertical(),
        }
    }
}

impl GameplayTuning {
    pub fn apply_to(&self, tweaks: &mut PhysicsTweaks) {
        tweaks.ball_gravity = self.ball_gravity;
        tweaks.ball_drag = self.ball_drag.clamp(0.0, MAX_RETAINED_RATIO);
        tweaks.ball_bounce = self.ball_bounce.clamp(0.0, MAX_RETAINED_RATIO);
        tweaks.bounce_threshold = self.bounce_threshold.max(0.0);
        tweaks.stop_speed = self.stop_speed.max(0.0);
        tweaks.spin_factor = self.spin_factor;
        tweaks.kick_horizontal_scale = self.kick_horizontal_scale;
        tweaks.kick_vertical_scale = self.kick_vertical_scale;
        tweaks.kick_forward_scale = self.kick_forward_scale;
        tweaks.kick_noise_horizontal = self.kick_noise_horizontal.max(0.0);
        tweaks.kick_noise_vertical = self.kick_noise_vertical.max(0.0);
    }
}

/// Runtime physics values used by the ball integrator and kick
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PhysicsTweaks {
    pub ball_gravity: f32,
    pub ball_drag: f32,
    pub ball_bounce: f32,
    pub bounce_threshold: f32,
    pub stop_speed: f32,
    pub spin_factor: f32,
    pub kick_horizontal_scale: f32,
    pub kick_vertical_scale: f32,
    pub kick_forward_scale: f32,
    pub kick_noise_horizontal: f32,
    pub kick_noise_vertical: f32,
}

impl Default for PhysicsTweaks {
    fn default() -> Self {
        let defaults = GameplayTuning::default();
        Self {
            ball_gravity: defaults.ball_gravity,
            ball_drag: defaults.ball_drag,
            ball_bounce: defaults.ball_bounce,
            bounce_threshold: defaults.bounce_threshold,
            stop_speed: defaults.stop_speed,
            spin_factor: defaults.spin_factor,
            kick_horizontal_scale: defaults.kick_horizontal_scale,
            kick_vertical_scale: defaults.kick_vertical_scale,
            kick_forward_scale: defaults.kick_forward_scale,
            kick_noise_horizontal: defaults.kick_noise_horizontal,
            kick_noise_vertical: defaults.kick_noise_vertical,
        }
    }
}

pub fn load_gameplay_tuning_from_file(path: &str) -> Result<GameplayTuning, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| ConfigError::json(path, e))
}

/// Load the tuning file into `tweaks`, leaving defaults in place on failure.
pub fn apply_global_tuning(tweaks: &mut PhysicsTweaks) -> Result<(), ConfigError> {
    match load_gameplay_tuning_from_file(GAMEPLAY_TUNING_FILE) {
        Ok(tuning) => {
            tuning.apply_to(tweaks);
            Ok(())
        }
        Err(err) => {
            GameplayTuning::default().apply_to(tweaks);
            Err(err)
        }
    }
}

/// Tweaks loaded from the global tuning file, or defaults with a warning
pub fn load_physics_tweaks() -> PhysicsTweaks {
    let mut tweaks = PhysicsTweaks::default();
    if let Err(err) = apply_global_tuning(&mut tweaks) {
        warn!("{}, using default physics tuning", err);
    }
    tweaks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_tuning_uses_defaults() {
        let tuning: GameplayTuning = serde_json::from_str(r#"{ "ball_gravity": 20.0 }"#).unwrap();
        assert_eq!(tuning.ball_gravity, 20.0);
        assert_eq!(tuning.ball_drag, BALL_DRAG);
        assert_eq!(tuning.ball_bounce, BALL_BOUNCE);
    }

    #[test]
    fn test_apply_clamps_ratios() {
        let tuning = GameplayTuning {
            ball_drag: 1.5,
            ball_bounce: -0.2,
            ..Default::default()
        };
        let mut tweaks = PhysicsTweaks::default();
        tuning.apply_to(&mut tweaks);
        assert_eq!(tweaks.ball_drag, MAX_RETAINED_RATIO);
        assert_eq!(tweaks.ball_bounce, 0.0);

        let lossless = GameplayTuning {
            ball_drag: 1.0,
            ball_bounce: 1.0,
            ..Default::default()
        };
        lossless.apply_to(&mut tweaks);
        assert!(tweaks.ball_drag < 1.0);
        assert!(tweaks.ball_bounce < 1.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_gameplay_tuning_from_file("config/does_not_exist.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
