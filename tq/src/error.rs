//! Throttled queue error types

use thiserror::Error;

/// Errors that can occur when building or feeding a throttled queue
#[derive(Debug, Error)]
pub enum ThrottleError {
    #[error("tau must be at least 0 (got {value})")]
    InvalidConfiguration { value: String },

    #[error("Queue full, capacity {capacity}")]
    QueueFull { capacity: usize },

    #[error("No tokio runtime available to drive the cooldown timer")]
    NoRuntime,
}

impl ThrottleError {
    pub(crate) fn invalid(value: impl std::fmt::Display) -> Self {
        ThrottleError::InvalidConfiguration {
            value: value.to_string(),
        }
    }

    /// Check if this is a configuration error
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, ThrottleError::InvalidConfiguration { .. })
    }

    /// Check if this error came from a bounded queue rejecting a job
    pub fn is_queue_full(&self) -> bool {
        matches!(self, ThrottleError::QueueFull { .. })
    }
}
