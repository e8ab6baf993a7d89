//! # queue-types
//!
//! Record types for the Pitstop offline action queue.
//!
//! This crate provides the foundational types used across all Pitstop queue crates:
//! - [`ActionId`], [`Timestamp`] - Identity and time types
//! - [`QueuedAction`], [`ActionStatus`] - The persisted queue record
//! - [`ActionError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod action;
mod error;
mod ids;

pub use action::{ActionStatus, QueuedAction};
pub use error::ActionError;
pub use ids::{ActionId, Timestamp};
