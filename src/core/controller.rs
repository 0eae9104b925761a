//! The interval session state machine.
//!
//! States: `Idle -> Running <-> Paused`, `Running -> Completed`, and any state
//! back to `Idle` through `stop()`. The countdown is driven by `tick()` once
//! per second while running; `reconcile_after_resume()` recomputes it from the
//! wall clock after ticks were missed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::choice::SoundChoice;
use super::clock::{Clock, SystemClock};
use super::display::format_mmss;
use super::listener::SessionListener;
use super::session::{IntervalConfig, Session};

/// Lifecycle phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No session.
    Idle,
    /// Counting down.
    Running,
    /// Session in progress, countdown held.
    Paused,
    /// Every interval finished; waiting for `stop()`.
    Completed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// Owns the timing state of one interval session.
///
/// Invariants:
/// - `seconds_remaining <= interval_seconds`
/// - `current_interval_index <= total_intervals`, equal only when completed
/// - `interval_started_at.is_some() == is_running()`
pub struct IntervalController<C: Clock = SystemClock> {
    /// Applied at the next `start_session()`.
    config: IntervalConfig,
    /// Fixed for the in-flight session.
    active: IntervalConfig,
    phase: Phase,
    current_interval_index: u32,
    seconds_remaining: u32,
    /// Wall-clock instant the current interval's countdown would have begun
    /// had it never been paused.
    interval_started_at: Option<DateTime<Utc>>,
    session_started_at: Option<DateTime<Utc>>,
    session: Option<Session>,
    listeners: Vec<Box<dyn SessionListener>>,
    clock: C,
}

impl IntervalController<SystemClock> {
    /// Create a controller on the system clock.
    #[must_use]
    pub fn new(config: IntervalConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> IntervalController<C> {
    /// Create a controller on the given clock.
    #[must_use]
    pub fn with_clock(config: IntervalConfig, clock: C) -> Self {
        Self {
            config,
            active: config,
            phase: Phase::Idle,
            current_interval_index: 0,
            seconds_remaining: config.interval_seconds(),
            interval_started_at: None,
            session_started_at: None,
            session: None,
            listeners: Vec::new(),
            clock,
        }
    }

    /// Register a listener for lifecycle notifications.
    pub fn add_listener(&mut self, listener: Box<dyn SessionListener>) {
        self.listeners.push(listener);
    }

    /// Change the configuration used by the next session.
    ///
    /// An in-flight session keeps the configuration it started with. When idle
    /// the countdown is reset to the new interval length.
    pub fn configure(&mut self, config: IntervalConfig) {
        self.config = config;
        if self.phase == Phase::Idle {
            self.active = config;
            self.seconds_remaining = config.interval_seconds();
        }
    }

    /// The clock this controller reads.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Start a new session and arm the countdown.
    ///
    /// Any session already in progress is discarded without being finalized
    /// and returned to the caller.
    pub fn start_session(&mut self, mut session: Session) -> Option<Session> {
        let now = self.clock.now();
        let displaced = self.session.take();
        if let Some(ref old) = displaced {
            warn!(
                phase = %self.phase,
                interval = self.current_interval_index,
                "starting a session over one in progress; discarding it"
            );
            debug!(id = ?old.id, "discarded session");
        }

        self.active = self.config;
        session.started_at = now;
        session.ended_at = None;
        session.interval_seconds = self.active.interval_seconds();
        session.total_intervals = self.active.total_intervals();
        session.completed_intervals = 0;
        session.is_completed = false;

        self.phase = Phase::Running;
        self.current_interval_index = 0;
        self.seconds_remaining = self.active.interval_seconds();
        self.session_started_at = Some(now);
        self.interval_started_at = Some(now);
        self.session = Some(session);

        info!(
            interval_seconds = self.active.interval_seconds(),
            total_intervals = self.active.total_intervals(),
            "session started"
        );
        displaced
    }

    /// Hold the countdown. No-op unless running.
    pub fn pause(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.phase = Phase::Paused;
        self.interval_started_at = None;
        debug!(
            interval = self.current_interval_index,
            seconds_remaining = self.seconds_remaining,
            "paused"
        );
    }

    /// Continue a paused countdown. No-op unless paused.
    ///
    /// The interval anchor is re-stamped so that it sits exactly as far in the
    /// past as the countdown has progressed; time spent paused never counts as
    /// elapsed in a later [`reconcile_after_resume`](Self::reconcile_after_resume).
    pub fn resume(&mut self) {
        if self.phase != Phase::Paused {
            return;
        }
        let now = self.clock.now();
        let elapsed = self.active.interval_seconds() - self.seconds_remaining;
        self.interval_started_at = Some(now - Duration::seconds(i64::from(elapsed)));
        self.phase = Phase::Running;
        debug!(
            interval = self.current_interval_index,
            seconds_remaining = self.seconds_remaining,
            "resumed"
        );
    }

    /// End the session from any state and return to `Idle`.
    ///
    /// A session that has not been finalized yet is stamped with the current
    /// time and the number of intervals finished so far. The session is handed
    /// back to the caller.
    pub fn stop(&mut self) -> Option<Session> {
        let now = self.clock.now();
        let completed = self.current_interval_index;
        let session = self.session.take().map(|mut session| {
            if session.ended_at.is_none() {
                session.ended_at = Some(now);
                session.completed_intervals = completed;
            }
            session
        });

        if self.phase != Phase::Idle {
            info!(phase = %self.phase, completed_intervals = completed, "session stopped");
        }

        self.active = self.config;
        self.phase = Phase::Idle;
        self.current_interval_index = 0;
        self.seconds_remaining = self.active.interval_seconds();
        self.interval_started_at = None;
        self.session_started_at = None;
        session
    }

    /// Apply one elapsed second. No-op unless running.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.tick_at(now);
    }

    /// Apply the second that elapsed at `at`.
    ///
    /// A rollover anchors the next interval at `at` rather than the clock's
    /// current reading, so a host catching up on late ticks keeps the anchor
    /// on the real boundary. No-op unless running.
    pub fn tick_at(&mut self, at: DateTime<Utc>) {
        if self.phase != Phase::Running {
            return;
        }

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        let (index, remaining) = (self.current_interval_index, self.seconds_remaining);
        for listener in &mut self.listeners {
            listener.on_tick(index, remaining);
        }

        if self.seconds_remaining == 0 {
            self.roll_over(at);
        }
    }

    /// Recompute the countdown from the wall clock after ticks were missed.
    ///
    /// Skipped intervals are folded into a single interval-complete
    /// notification for the interval now in progress; if the whole session has
    /// elapsed, it completes directly. No-op unless running.
    pub fn reconcile_after_resume(&mut self, now: DateTime<Utc>) {
        if self.phase != Phase::Running {
            return;
        }
        let Some(anchor) = self.interval_started_at else {
            return;
        };

        let elapsed = now.signed_duration_since(anchor).num_seconds();
        if elapsed < 0 {
            debug!(elapsed, "clock is behind the interval anchor; nothing to reconcile");
            return;
        }

        let duration = i64::from(self.active.interval_seconds());
        let total = i64::from(self.active.total_intervals());
        let missed = elapsed / duration;
        let into_current = elapsed % duration;

        if missed > 0 {
            let target = i64::from(self.current_interval_index) + missed;
            if target >= total {
                info!(missed, "session elapsed while suspended");
                self.complete(now);
                return;
            }

            let index = u32::try_from(target).unwrap_or(self.active.total_intervals());
            self.current_interval_index = index;
            self.interval_started_at = Some(now - Duration::seconds(into_current));
            if let Some(session) = self.session.as_mut() {
                session.completed_intervals = index;
            }
            info!(missed, interval = index, "caught up after suspension");
            self.notify_interval_complete(index - 1);
        }

        let into_current = u32::try_from(into_current).unwrap_or(0);
        self.seconds_remaining = self.active.interval_seconds() - into_current;
    }

    /// Finish the current interval: advance, or complete the session.
    fn roll_over(&mut self, now: DateTime<Utc>) {
        let completed = self.current_interval_index;
        self.current_interval_index += 1;
        if let Some(session) = self.session.as_mut() {
            session.completed_intervals = self.current_interval_index;
        }

        if self.current_interval_index >= self.active.total_intervals() {
            self.notify_interval_complete(completed);
            self.complete(now);
        } else {
            self.seconds_remaining = self.active.interval_seconds();
            self.interval_started_at = Some(now);
            info!(completed, next = self.current_interval_index, "interval complete");
            self.notify_interval_complete(completed);
        }
    }

    /// Enter `Completed`, finalize the session, and notify.
    fn complete(&mut self, now: DateTime<Utc>) {
        let total = self.active.total_intervals();
        self.phase = Phase::Completed;
        self.current_interval_index = total;
        self.seconds_remaining = 0;
        self.interval_started_at = None;

        if let Some(session) = self.session.as_mut() {
            session.ended_at = Some(now);
            session.completed_intervals = total;
            session.is_completed = true;
        }
        info!(total_intervals = total, "session complete");

        if let Some(session) = self.session.as_ref() {
            for listener in &mut self.listeners {
                listener.on_session_complete(session);
            }
        }
    }

    fn notify_interval_complete(&mut self, completed_index: u32) {
        for listener in &mut self.listeners {
            listener.on_interval_complete(completed_index);
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the countdown is actively decrementing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// 0-based index of the interval in progress (or about to start).
    #[must_use]
    pub const fn current_interval_index(&self) -> u32 {
        self.current_interval_index
    }

    /// Countdown within the current interval.
    #[must_use]
    pub const fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    /// Anchor of the current interval's countdown; present iff running.
    #[must_use]
    pub const fn interval_started_at(&self) -> Option<DateTime<Utc>> {
        self.interval_started_at
    }

    /// When the session started; absent when idle.
    #[must_use]
    pub const fn session_started_at(&self) -> Option<DateTime<Utc>> {
        self.session_started_at
    }

    /// The session being run, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Seconds per interval for the in-flight (or next) session.
    #[must_use]
    pub const fn interval_seconds(&self) -> u32 {
        self.active.interval_seconds()
    }

    /// Intervals in the in-flight (or next) session.
    #[must_use]
    pub const fn total_intervals(&self) -> u32 {
        self.active.total_intervals()
    }

    /// Overall session completion in `[0, 1]`.
    #[must_use]
    pub fn progress_fraction(&self) -> f64 {
        match self.phase {
            Phase::Idle => 0.0,
            Phase::Completed => 1.0,
            Phase::Running | Phase::Paused => {
                let duration = u64::from(self.active.interval_seconds());
                let done = u64::from(self.current_interval_index) * duration
                    + (duration - u64::from(self.seconds_remaining));
                ratio(done, self.active.session_seconds())
            }
        }
    }

    /// Fraction of the current interval already elapsed, in `[0, 1]`.
    #[must_use]
    pub fn interval_progress_fraction(&self) -> f64 {
        match self.phase {
            Phase::Idle => 0.0,
            Phase::Completed => 1.0,
            Phase::Running | Phase::Paused => {
                let duration = u64::from(self.active.interval_seconds());
                ratio(duration - u64::from(self.seconds_remaining), duration)
            }
        }
    }

    /// Countdown as `mm:ss`.
    #[must_use]
    pub fn time_remaining_display(&self) -> String {
        format_mmss(self.seconds_remaining)
    }

    /// Short human status, e.g. `Interval 3 of 10`.
    #[must_use]
    pub fn status_label(&self) -> String {
        let number = self.current_interval_index + 1;
        let total = self.active.total_intervals();
        match self.phase {
            Phase::Idle => "Ready".to_string(),
            Phase::Running => format!("Interval {number} of {total}"),
            Phase::Paused => format!("Paused (interval {number} of {total})"),
            Phase::Completed => "Session complete".to_string(),
        }
    }

    /// Alert sound for the current interval.
    #[must_use]
    pub const fn current_alert_choice(&self) -> SoundChoice {
        SoundChoice::for_interval(self.current_interval_index)
    }

    /// Music track for the current interval.
    #[must_use]
    pub const fn current_music_choice(&self) -> SoundChoice {
        SoundChoice::for_interval(self.current_interval_index)
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 1.0;
    }
    (part as f64 / whole as f64).min(1.0)
}
