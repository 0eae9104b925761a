//! Companion snapshot publishing.
//!
//! A running session publishes its state to `state.json` so other processes
//! (the `status` command, editor plugins, status bars) can show it.

pub mod publisher;
pub mod snapshot;

pub use publisher::{CompanionSync, FileSync, PublishReason, SyncThrottle};
pub use snapshot::SessionSnapshot;
