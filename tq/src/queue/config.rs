//! Throttled queue configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::tau::Tau;

/// Throttled queue configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Minimum spacing between job starts, in milliseconds
    #[serde(default, rename = "tau_ms")]
    pub tau: Tau,

    /// Capacity enforced by `try_push`; `None` means unbounded
    #[serde(default)]
    pub max_pending: Option<usize>,
}

impl QueueConfig {
    pub fn new(tau: Tau) -> Self {
        Self { tau, max_pending: None }
    }

    /// Bound the pending queue for `try_push`
    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = Some(max_pending);
        self
    }

    /// Get the cooldown as a Duration
    pub fn cooldown(&self) -> Duration {
        self.tau.as_duration()
    }
}
