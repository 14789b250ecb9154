//! Scoring module - goal geometry, save checks and shot classification

mod resolver;
mod tracker;

pub use resolver::*;
pub use tracker::*;
