//! Penaltykick - a penalty shootout game core built on Bevy's ECS
//!
//! The match runs headless: `PenaltyMatch` owns the ball, the keeper, the
//! level progression and a step scheduler, and `PenaltyPlugin` drives it
//! from Bevy's fixed timestep. Simulation and scenario tooling sit on top.

// Core modules
pub mod constants;
pub mod countdown;
pub mod error;
pub mod events;
pub mod kinematics;
pub mod settings;
pub mod simulation;
pub mod testing;
pub mod timers;
pub mod tuning;

// Game logic modules
pub mod ball;
pub mod game;
pub mod goalkeeper;
pub mod plugin;
pub mod scoring;
pub mod shooting;

// Re-export commonly used types for convenience
pub use ball::{Ball, BallStep};
pub use constants::*;
pub use countdown::{CountdownStep, ShotCountdown};
pub use error::ConfigError;
pub use events::{BusEvent, EventBus, EventLog, GameEvent};
pub use game::{GameOverReason, MatchSnapshot, MatchState, PenaltyMatch, Phase};
pub use goalkeeper::{DiveDecision, Goalkeeper, KeeperControl};
pub use plugin::{ActiveMatch, PendingInputs, PenaltyPlugin};
pub use scoring::{GoalBounds, SaveClassification, ShotOutcome, ShotTracker};
pub use settings::{GameMode, MATCH_SETTINGS_FILE, MatchSettings};
pub use shooting::{DiveInput, PowerMeter, ShotInput};
pub use timers::Scheduler;
pub use tuning::{GameplayTuning, PhysicsTweaks, load_physics_tweaks};
