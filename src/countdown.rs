//! Save-mode countdown - shows 3-2-1 before each automatic shot
//!
//! The countdown only counts; the match schedules one tick per second on its
//! scheduler and fires the shot when the count runs out.

use crate::constants::COUNTDOWN_START;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShotCountdown {
    remaining: u32,
    active: bool,
}

/// Result of one countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Still counting, showing this number
    Show(u32),
    /// Count finished: take the shot
    Fire,
}

impl ShotCountdown {
    /// Start a new countdown at 3
    pub fn start(&mut self) {
        self.remaining = COUNTDOWN_START;
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.remaining = 0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number currently shown, if counting
    pub fn display_number(&self) -> Option<u32> {
        self.active.then_some(self.remaining)
    }

    /// One second has passed
    pub fn tick(&mut self) -> Option<CountdownStep> {
        if !self.active {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            Some(CountdownStep::Show(self.remaining))
        } else {
            self.active = false;
            Some(CountdownStep::Fire)
        }
    }
}
