//! Dispatch state and statistics

use std::fmt;

/// Whether the dispatcher may start a job right now
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchState {
    /// No cooldown active; the next advance runs the head job
    #[default]
    Idle,

    /// A job started less than tau ago; arrivals wait in the queue
    CoolingDown,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchState::Idle => write!(f, "idle"),
            DispatchState::CoolingDown => write!(f, "cooling-down"),
        }
    }
}

/// Statistics for the throttled queue
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueueStats {
    pub total_pushed: u64,
    pub total_executed: u64,
    pub total_panicked: u64,
    pub total_rejected: u64,
    pub peak_pending: usize,
}

/// Point-in-time view of a queue
#[derive(Debug, Clone)]
pub struct QueueState {
    pub state: DispatchState,
    pub pending: usize,
    pub stats: QueueStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_idle() {
        assert_eq!(DispatchState::default(), DispatchState::Idle);
        assert_eq!(DispatchState::CoolingDown.to_string(), "cooling-down");
    }
}
