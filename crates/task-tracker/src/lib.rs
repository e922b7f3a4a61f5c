//! Tracks background agent runs until they finish.
//!
//! [`TaskTracker::run`] starts the agent for an integration and spawns a
//! poll loop for the returned task id. Each loop polls the job status on a
//! fixed interval, stops on a terminal status or after `max_polls`, and
//! broadcasts a [`TrackerEvent`] when it does.

mod config;
mod error;
mod events;
mod status;
pub mod task_fsm;
mod tracker;

pub use config::{TrackerConfig, DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL};
pub use error::{TrackerError, TrackerResult};
pub use events::{TaskOutcome, TrackerEvent};
pub use status::TaskStatus;
pub use tracker::{TaskTracker, TrackedTask};
