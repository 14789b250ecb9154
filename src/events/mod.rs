//! Match events
//!
//! The match pushes `GameEvent`s onto its `EventBus`; consumers drain them
//! for logging, simulation metrics and scenario checks. `EventLog` persists
//! a session as JSON lines.

mod bus;
mod event_log;
mod types;

pub use bus::{BusEvent, EventBus};
pub use event_log::{EventLog, LOG_DIR, read_event_log};
pub use types::GameEvent;
