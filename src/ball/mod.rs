//! Ball module - ball state and projectile physics

mod components;
mod physics;

pub use components::*;
