//! # queue-core
//!
//! Pure logic for the Pitstop offline queue (no I/O, instant tests).
//!
//! This crate decides what happens to a queued action after a sync
//! attempt and which records have outlived the retention window. It never
//! touches storage or the network.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. The I/O (SQLite, remote dispatch) is performed by
//! `queue-client`, which persists the records and publishes the events
//! produced here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod events;
pub mod retention;
pub mod retry;

pub use events::{QueueEvent, QueueStats, SkipReason, SyncReport};
pub use retention::{RetentionWindow, DEFAULT_RETENTION};
pub use retry::{AttemptOutcome, RetryPolicy, DEFAULT_MAX_RETRIES};
