//! Throttled job queue
//!
//! Runs submitted jobs one at a time in submission order, keeping the
//! starts of consecutive jobs at least tau apart.

mod config;
mod core;
mod state;

pub use config::QueueConfig;
pub use self::core::{Job, ThrottledQueue};
pub use state::{DispatchState, QueueState, QueueStats};
