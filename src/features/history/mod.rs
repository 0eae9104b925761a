//! Session history.
//!
//! Persists finished and in-progress sessions and summarizes them:
//! - Session storage in the local database
//! - Reports over today, the last week, the last month, or all time

pub mod report;
pub mod storage;

pub use report::{ReportPeriod, SessionReport};
pub use storage::SessionStorage;
