//! The interval session core.
//!
//! A single state holder, [`IntervalController`], owns the timing state of one
//! run of the interval program. It turns one-second ticks and wall-clock gaps
//! into interval and session transitions and reports them to registered
//! [`SessionListener`]s. Everything the host does in response (sounds,
//! notifications, persistence, companion sync, rendering) lives outside this
//! module.

pub mod choice;
pub mod clock;
pub mod controller;
pub mod display;
pub mod listener;
pub mod session;

pub use choice::SoundChoice;
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{IntervalController, Phase};
pub use display::{format_duration, format_mmss, parse_duration, render_progress_bar};
pub use listener::{SessionEvent, SessionListener};
pub use session::{IntervalConfig, Session, SessionOutcome};
