//! Features built around the session controller.
//!
//! - Session history and reports
//! - Schedule preview
//! - Shell completions
//! - Companion snapshot publishing

pub mod history;
pub mod plan;
pub mod shell;
pub mod sync;
