//! Deferred callback scheduling
//!
//! The queue only needs one capability from its host: run a callback once a
//! delay has elapsed. Timers are fire-and-forget; nothing cancels them.

use std::time::Duration;

use tokio::runtime::Handle;
use tracing::debug;

use crate::error::ThrottleError;

/// Callback invoked when a timer fires
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Schedules a callback to run after a delay
pub trait Timer: Send + Sync {
    fn schedule_after(&self, delay: Duration, callback: TimerCallback);
}

/// Timer backed by a tokio runtime
#[derive(Debug, Clone)]
pub struct TokioTimer {
    handle: Handle,
}

impl TokioTimer {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Bind to the runtime of the calling context
    pub fn current() -> Result<Self, ThrottleError> {
        let handle = Handle::try_current().map_err(|_| ThrottleError::NoRuntime)?;
        Ok(Self::new(handle))
    }
}

impl Timer for TokioTimer {
    fn schedule_after(&self, delay: Duration, callback: TimerCallback) {
        debug!(?delay, "TokioTimer::schedule_after: called");
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
    }
}
