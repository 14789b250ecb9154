//! Tunable constants for penaltykick
//!
//! All gameplay values are defined here for easy tweaking. Distances are in
//! meters, the goal line sits at z = 0 and the kicker shoots toward -z.

use bevy::prelude::*;

// =============================================================================
// BALL PHYSICS
// =============================================================================

pub const BALL_RADIUS: f32 = 0.22; // Standard match ball
pub const BALL_SPAWN: Vec3 = Vec3::new(0.0, BALL_RADIUS, 11.0); // Penalty spot, 11m out
pub const BALL_GRAVITY: f32 = 9.8;
pub const BALL_DRAG: f32 = 0.99; // Horizontal/forward velocity retained per physics step
pub const MAX_RETAINED_RATIO: f32 = 0.999; // Upper clamp for drag and bounce so a ball always settles
pub const BALL_BOUNCE: f32 = 0.6; // Coefficient of restitution on ground contact
pub const BALL_BOUNCE_THRESHOLD: f32 = 0.1; // |vy| at or below this comes to rest instead of bouncing
pub const BALL_STOP_SPEED: f32 = 0.1; // Ball stops when speed drops below this
pub const BALL_SPIN_FACTOR: f32 = 0.2; // Radians of roll per meter travelled (cosmetic)

// =============================================================================
// KICKING
// =============================================================================

pub const KICK_HORIZONTAL_SCALE: f32 = 50.0;
pub const KICK_VERTICAL_SCALE: f32 = 40.0;
pub const KICK_FORWARD_SCALE: f32 = 70.0;
pub const KICK_MIN_LIFT: f32 = 0.3; // Every kick gets at least this much vertical aim
pub const KICK_NOISE_HORIZONTAL: f32 = 15.0; // Max sideways error at difficulty 0
pub const KICK_NOISE_VERTICAL: f32 = 10.0; // Max extra lift at difficulty 0

// =============================================================================
// GOAL
// =============================================================================

pub const GOAL_WIDTH: f32 = 7.32;
pub const GOAL_HEIGHT: f32 = 2.44;
pub const GOAL_DEPTH: f32 = 2.0;

// =============================================================================
// GOALKEEPER
// =============================================================================

pub const KEEPER_SPAWN: Vec3 = Vec3::new(0.0, 1.0, -0.5); // Just in front of the goal
pub const KEEPER_BASE_DIVE_SPEED: f32 = 0.05; // Dive progress per step at difficulty 0
pub const KEEPER_BASE_DIVE_DISTANCE: f32 = 2.5;
pub const KEEPER_DIVE_DISTANCE_BONUS: f32 = 1.5; // Added at difficulty 100
pub const KEEPER_VERTICAL_REACH: f32 = 1.5;
pub const KEEPER_LOW_DIVE_ADVANCE: f32 = 1.5; // Forward step on low dives
pub const KEEPER_MIN_HEIGHT: f32 = 0.5; // Dive targets never go below this
pub const KEEPER_MISREAD_NOISE: f32 = 0.5;
pub const KEEPER_READ_NOISE: f32 = 0.8; // Scaled by (1 - accuracy)
pub const KEEPER_LATERAL_LIMIT: f32 = 2.5; // Idle/tracking movement stays within ±this
pub const KEEPER_TRACKING_MAX: f32 = 0.05;
pub const KEEPER_ANTICIPATION_INTERVAL: f32 = 2.0; // Seconds between anticipation rolls
pub const KEEPER_IDLE_SWAY: f32 = 0.2;

// =============================================================================
// SAVING
// =============================================================================

pub const SAVE_RADIUS_BASE: f32 = 3.0;
pub const SAVE_RADIUS_DIVISOR: f32 = 20.0; // (100 - difficulty) / this is added to the base

// =============================================================================
// MATCH FLOW
// =============================================================================

pub const MAX_SHOTS: u32 = 5;
pub const LEVEL_GOALS_REQUIRED: u32 = 3;
pub const MAX_LEVEL: u32 = 100;
pub const MAX_DIFFICULTY: u32 = 100;
pub const DIFFICULTY_PER_LEVEL: u32 = 5;

pub const REACTION_TIME_BASE_MS: u32 = 300;
pub const REACTION_TIME_PER_LEVEL_MS: u32 = 2;
pub const REACTION_TIME_MIN_MS: u32 = 100;
pub const REACTION_JITTER_X: f32 = 0.2; // ± horizontal jitter on the keeper's read of the shot
pub const REACTION_JITTER_Y: f32 = 0.15;

pub const CELEBRATION_SECS: f32 = 2.0;
pub const LEVEL_ADVANCE_SECS: f32 = 3.0;
pub const LEVEL_INTRO_SECS: f32 = 2.0;
pub const COUNTDOWN_START: u32 = 3;
pub const COUNTDOWN_INTERVAL_SECS: f32 = 1.0;

// =============================================================================
// AUTO SHOTS (save mode)
// =============================================================================

pub const AUTO_SHOT_BASE_POWER: f32 = 0.7;
pub const AUTO_SHOT_LEVEL_POWER: f32 = 0.2; // Added at level 100
pub const AUTO_SHOT_DIFFICULTY_POWER: f32 = 0.1; // Added at difficulty 100
pub const AUTO_SHOT_SPREAD_X: f32 = 0.8;
pub const AUTO_SHOT_MAX_Y: f32 = 0.8;

// =============================================================================
// POWER METER
// =============================================================================

pub const POWER_METER_STEP: f32 = 0.02; // Power change per step while charging

// =============================================================================
// TIMESTEP
// =============================================================================

pub const FIXED_HZ: f64 = 60.0;
pub const MIN_FIXED_HZ: f64 = 50.0; // Lowest accepted step rate
pub const MAX_STEPS_PER_FRAME: u32 = 8; // Frame spikes beyond this are dropped
