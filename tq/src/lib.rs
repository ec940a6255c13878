//! ThrottledQueue - rate-limited FIFO job dispatcher
//!
//! Jobs are zero-argument closures. They run one at a time, strictly in the
//! order they were pushed, and consecutive job starts are kept at least tau
//! milliseconds apart.
//!
//! # Dispatch
//!
//! ```text
//! push ──► pending (FIFO) ──► advance ──► run head job ──► arm cooldown(tau)
//!                               ▲                                │
//!                               └──────── cooldown elapsed ◄─────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use throttledqueue::{Tau, ThrottledQueue};
//!
//! let queue = ThrottledQueue::new(Tau::from_millis(100.0)?)?;
//! queue.push(|| println!("runs now"));
//! queue.push(|| println!("runs 100ms later"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod queue;
pub mod tau;
pub mod timer;

pub use config::Config;
pub use error::ThrottleError;
pub use queue::{DispatchState, Job, QueueConfig, QueueState, QueueStats, ThrottledQueue};
pub use tau::Tau;
pub use timer::{Timer, TimerCallback, TokioTimer};

/// Default number of jobs pushed by `tq run`
pub const DEFAULT_JOBS: usize = 5;
