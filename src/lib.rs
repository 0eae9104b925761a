//! interval-alarm - an interval timer for the terminal
//!
//! The core is [`core::IntervalController`], a clock-driven state machine for
//! a session of fixed-length intervals with alternating alert sounds and music
//! tracks. Around it sit session history in `SQLite`, a companion snapshot
//! file, and a ratatui terminal host.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use crate::core::{IntervalConfig, IntervalController, Session};
pub use error::AlarmError;
