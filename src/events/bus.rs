//! Event Bus - timestamped queue of match events
//!
//! The match emits into the bus as things happen; the Bevy log system, the
//! simulation runner and the scenario runner drain it.

use serde::{Deserialize, Serialize};

use super::types::GameEvent;

/// Timestamped event for the event bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusEvent {
    /// Time in milliseconds since match start
    pub time_ms: u32,
    /// Physics step the event happened on
    pub step: u64,
    /// The event data
    pub event: GameEvent,
}

#[derive(Debug, Default)]
pub struct EventBus {
    /// Events emitted since the last drain
    pending: Vec<BusEvent>,

    elapsed_ms: u32,
    step: u64,

    /// Whether the bus is enabled (off for bulk simulation)
    enabled: bool,
}

impl EventBus {
    /// Create a new enabled event bus
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// Create a disabled event bus (events are dropped)
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Update the clock used for timestamps
    pub fn update_time(&mut self, elapsed_secs: f64, step: u64) {
        self.elapsed_ms = (elapsed_secs * 1000.0) as u32;
        self.step = step;
    }

    pub fn emit(&mut self, event: GameEvent) {
        if !self.enabled {
            return;
        }
        self.pending.push(BusEvent {
            time_ms: self.elapsed_ms,
            step: self.step,
            event,
        });
    }

    /// Pending events without draining
    pub fn peek(&self) -> &[BusEvent] {
        &self.pending
    }

    /// Hand over pending events; the bus keeps nothing once drained
    pub fn drain(&mut self) -> Vec<BusEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
