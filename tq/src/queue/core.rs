//! Throttled queue implementation

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error};

use crate::error::ThrottleError;
use crate::tau::Tau;
use crate::timer::{Timer, TokioTimer};

use super::config::QueueConfig;
use super::state::{DispatchState, QueueState, QueueStats};

/// A unit of work submitted to the queue
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Internal state protected by mutex
struct QueueInner {
    /// Jobs waiting to run, oldest first
    pending: VecDeque<Job>,

    /// Cooldown slot; `CoolingDown` doubles as the mutual-exclusion flag
    state: DispatchState,

    /// Statistics
    stats: QueueStats,
}

struct Shared {
    config: QueueConfig,
    inner: Mutex<QueueInner>,
    timer: Arc<dyn Timer>,
}

/// FIFO dispatcher that runs one job at a time, starting consecutive jobs
/// at least tau apart.
///
/// Cloning yields another handle to the same queue. Jobs already queued keep
/// draining after every handle is dropped.
#[derive(Clone)]
pub struct ThrottledQueue {
    shared: Arc<Shared>,
}

impl ThrottledQueue {
    /// Create an unbounded queue driven by the current tokio runtime
    pub fn new(tau: Tau) -> Result<Self, ThrottleError> {
        Self::with_config(QueueConfig::new(tau))
    }

    /// Create a queue from a configuration, driven by the current tokio runtime
    pub fn with_config(config: QueueConfig) -> Result<Self, ThrottleError> {
        let timer = TokioTimer::current()?;
        Ok(Self::with_timer(config, Arc::new(timer)))
    }

    /// Create a queue with an explicit timer
    pub fn with_timer(config: QueueConfig, timer: Arc<dyn Timer>) -> Self {
        debug!(?config, "ThrottledQueue::with_timer: called");
        Self {
            shared: Arc::new(Shared {
                config,
                inner: Mutex::new(QueueInner {
                    pending: VecDeque::new(),
                    state: DispatchState::Idle,
                    stats: QueueStats::default(),
                }),
                timer,
            }),
        }
    }

    /// Append a job and try to run the head of the queue
    pub fn push<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        debug!("ThrottledQueue::push: called");
        self.shared.enqueue(Box::new(job));
        self.shared.advance();
    }

    /// Like `push`, but honors `max_pending`
    pub fn try_push<F>(&self, job: F) -> Result<(), ThrottleError>
    where
        F: FnOnce() + Send + 'static,
    {
        debug!("ThrottledQueue::try_push: called");
        match self.shared.config.max_pending {
            Some(capacity) => self.shared.enqueue_bounded(Box::new(job), capacity)?,
            None => self.shared.enqueue(Box::new(job)),
        }
        self.shared.advance();
        Ok(())
    }

    /// The configured throttle period
    pub fn tau(&self) -> Tau {
        self.shared.config.tau
    }

    pub fn state(&self) -> DispatchState {
        debug!("ThrottledQueue::state: called");
        self.shared.lock().state
    }

    /// Number of jobs waiting to run
    pub fn pending(&self) -> usize {
        debug!("ThrottledQueue::pending: called");
        self.shared.lock().pending.len()
    }

    pub fn stats(&self) -> QueueStats {
        debug!("ThrottledQueue::stats: called");
        self.shared.lock().stats.clone()
    }

    /// Get current state, queue depth and statistics in one read
    pub fn snapshot(&self) -> QueueState {
        debug!("ThrottledQueue::snapshot: called");
        let inner = self.shared.lock();
        QueueState {
            state: inner.state,
            pending: inner.pending.len(),
            stats: inner.stats.clone(),
        }
    }
}

impl fmt::Debug for ThrottledQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("ThrottledQueue")
            .field("tau", &self.shared.config.tau)
            .field("state", &snapshot.state)
            .field("pending", &snapshot.pending)
            .finish()
    }
}

impl Shared {
    // Never held while a job runs, so jobs may push onto their own queue
    fn lock(&self) -> MutexGuard<'_, QueueInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enqueue(&self, job: Job) {
        Self::append(&mut self.lock(), job);
    }

    /// Capacity check and append share one guard so concurrent producers
    /// cannot overshoot `capacity`
    fn enqueue_bounded(&self, job: Job, capacity: usize) -> Result<(), ThrottleError> {
        let mut inner = self.lock();
        if inner.pending.len() >= capacity {
            debug!(capacity, "Shared::enqueue_bounded: queue full, rejecting");
            inner.stats.total_rejected += 1;
            return Err(ThrottleError::QueueFull { capacity });
        }
        Self::append(&mut inner, job);
        Ok(())
    }

    fn append(inner: &mut QueueInner, job: Job) {
        inner.pending.push_back(job);
        inner.stats.total_pushed += 1;
        inner.stats.peak_pending = inner.stats.peak_pending.max(inner.pending.len());
    }

    /// Run the head job unless a cooldown is active, then arm the cooldown
    fn advance(self: &Arc<Self>) {
        let job = {
            let mut inner = self.lock();
            if inner.state == DispatchState::CoolingDown {
                debug!(pending = inner.pending.len(), "Shared::advance: cooling down, deferring");
                return;
            }
            let Some(job) = inner.pending.pop_front() else {
                debug!("Shared::advance: queue empty, idle");
                return;
            };
            // Claim the slot before running so nested pushes only enqueue
            inner.state = DispatchState::CoolingDown;
            inner.stats.total_executed += 1;
            job
        };

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            self.lock().stats.total_panicked += 1;
            error!(reason = %panic_message(payload.as_ref()), "Job panicked; continuing with next job");
        }

        let shared = Arc::clone(self);
        self.timer
            .schedule_after(self.config.cooldown(), Box::new(move || shared.cooldown_elapsed()));
    }

    fn cooldown_elapsed(self: &Arc<Self>) {
        debug!("Shared::cooldown_elapsed: called");
        self.lock().state = DispatchState::Idle;
        self.advance();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
