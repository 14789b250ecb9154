//! Shooting module - shot/dive inputs, power charge and automatic shots

mod auto;
mod charge;
mod input;

pub use auto::*;
pub use charge::*;
pub use input::*;
