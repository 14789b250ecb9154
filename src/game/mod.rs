//! Match/level state machine
//!
//! Ready → Shooting/Saving → Celebrating/LevelComplete → Ready, until the
//! shot budget runs out or the last level is cleared.

mod prompt;
mod session;
mod snapshot;
mod state;

pub use prompt::*;
pub use session::*;
pub use snapshot::*;
pub use state::*;
