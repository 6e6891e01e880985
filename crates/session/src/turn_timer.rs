//! Per-turn countdown.
//!
//! The timer counts whole ticks (one second each in the default
//! configuration). It is restarted at the start of every turn and driven by
//! [`TurnTimer::tick`]; it never reads a clock itself, so the owner decides
//! what a tick is and cancelling means simply not ticking a stopped timer.

/// Default number of ticks a player has for one move.
pub const DEFAULT_TURN_TICKS: u32 = 40;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Timer is stopped; nothing happened.
    Idle,
    /// Counted down; this many ticks are left.
    Running(u32),
    /// Reached zero on this tick. The timer stops itself.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnTimer {
    limit: u32,
    remaining: u32,
    running: bool,
}

impl TurnTimer {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            remaining: limit,
            running: false,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Start a fresh countdown for a new turn.
    pub fn restart(&mut self) {
        self.remaining = self.limit;
        self.running = true;
    }

    /// Freeze the countdown; later ticks are ignored until the next restart.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn tick(&mut self) -> TimerEvent {
        if !self.running {
            return TimerEvent::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            TimerEvent::Expired
        } else {
            TimerEvent::Running(self.remaining)
        }
    }
}

impl Default for TurnTimer {
    fn default() -> Self {
        Self::new(DEFAULT_TURN_TICKS)
    }
}

#[cfg(test)]
#[path = "turn_timer_tests.rs"]
mod turn_timer_tests;
