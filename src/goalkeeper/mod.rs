//! Goalkeeper module - keeper state, dive decisions and motion

mod components;
mod decision;
mod motion;

pub use components::*;
pub use decision::*;
