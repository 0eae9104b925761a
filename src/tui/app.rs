//! Host state shared by the terminal view and headless mode.
//!
//! The app drives the controller from the wall clock and reacts to its
//! notifications: it rings the bell, saves the session, and publishes
//! snapshots. Failures in those collaborators are logged and never interrupt
//! the countdown.

use std::sync::mpsc::{self, Receiver};

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::config::{Config, NotificationConfig, SoundConfig};
use crate::core::{
    Clock, IntervalConfig, IntervalController, Phase, Session, SessionEvent, SoundChoice,
    SystemClock,
};
use crate::error::AlarmError;
use crate::features::history::SessionStorage;
use crate::features::sync::{CompanionSync, PublishReason, SessionSnapshot, SyncThrottle};

/// A wall-clock gap longer than this is treated as a suspension.
pub const RECONCILE_GAP_SECONDS: i64 = 2;

/// Application state.
pub struct App<C: Clock = SystemClock> {
    /// The session state machine.
    pub controller: IntervalController<C>,
    events: Receiver<SessionEvent>,
    storage: SessionStorage,
    sync: Option<Box<dyn CompanionSync>>,
    throttle: SyncThrottle,
    sounds: SoundConfig,
    notifications: NotificationConfig,
    /// Last instant a countdown second was accounted for.
    last_tick: DateTime<Utc>,
    /// Messages produced since the last drain, oldest first.
    notices: Vec<String>,
    bell_pending: bool,
    /// Status message to display.
    pub status: Option<String>,
    /// Whether the help overlay is shown.
    pub show_help: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<C: Clock> App<C> {
    /// Create an app around a fresh controller.
    pub fn new(
        timing: IntervalConfig,
        clock: C,
        config: &Config,
        storage: SessionStorage,
        sync: Option<Box<dyn CompanionSync>>,
    ) -> Self {
        let now = clock.now();
        let mut controller = IntervalController::with_clock(timing, clock);
        let (tx, events) = mpsc::channel();
        controller.add_listener(Box::new(tx));

        Self {
            controller,
            events,
            storage,
            sync,
            throttle: SyncThrottle::new(config.sync.tick_publish_seconds),
            sounds: config.sounds.clone(),
            notifications: config.notifications.clone(),
            last_tick: now,
            notices: Vec::new(),
            bell_pending: false,
            status: Some("Press ? for help".to_string()),
            show_help: false,
            should_quit: false,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.controller.clock().now()
    }

    /// Start a new session and record it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be saved.
    pub fn start(&mut self) -> Result<(), AlarmError> {
        let now = self.now();
        let timing = IntervalConfig::new(
            self.controller.interval_seconds(),
            self.controller.total_intervals(),
        );
        if self.controller.phase() != Phase::Idle {
            self.stop();
        }

        let mut session = Session::new(timing, now);
        self.storage.save(&mut session)?;
        self.controller.start_session(session);
        self.last_tick = now;

        self.status = Some(self.controller.status_label());
        self.publish(PublishReason::Lifecycle);
        Ok(())
    }

    /// Bring the countdown up to the current wall-clock time.
    ///
    /// Missed seconds are ticked one by one; a gap longer than
    /// [`RECONCILE_GAP_SECONDS`] is handed to the controller's reconcile
    /// instead.
    pub fn update(&mut self) {
        let now = self.now();
        if !self.controller.is_running() {
            self.last_tick = now;
            self.process_events();
            return;
        }

        let gap = now.signed_duration_since(self.last_tick);
        if gap.num_seconds() > RECONCILE_GAP_SECONDS {
            info!(gap_seconds = gap.num_seconds(), "wall-clock gap; reconciling");
            self.controller.reconcile_after_resume(now);
            self.last_tick = now;
            self.publish(PublishReason::Lifecycle);
        } else {
            let second = Duration::seconds(1);
            while self.controller.is_running()
                && now.signed_duration_since(self.last_tick) >= second
            {
                self.last_tick += second;
                self.controller.tick_at(self.last_tick);
            }
        }

        self.process_events();
    }

    /// Pause a running session, resume a paused one, or start a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if a new session cannot be saved.
    pub fn toggle_pause(&mut self) -> Result<(), AlarmError> {
        match self.controller.phase() {
            Phase::Running => {
                self.update();
                self.controller.pause();
            }
            Phase::Paused => {
                self.controller.resume();
                self.last_tick = self.now();
            }
            Phase::Idle | Phase::Completed => return self.start(),
        }
        self.status = Some(self.controller.status_label());
        self.publish(PublishReason::Lifecycle);
        Ok(())
    }

    /// End the session and save it.
    pub fn stop(&mut self) -> Option<Session> {
        let mut session = self.controller.stop()?;
        self.save(&mut session);
        info!(
            completed_intervals = session.completed_intervals,
            outcome = %session.outcome(),
            "session saved"
        );
        self.status = Some(format!(
            "Stopped after {} of {} intervals",
            session.completed_intervals, session.total_intervals
        ));
        self.publish(PublishReason::Lifecycle);
        Some(session)
    }

    /// Stop, save, and request exit.
    pub fn quit(&mut self) -> Option<Session> {
        self.should_quit = true;
        self.stop()
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Messages produced since the last call.
    pub fn drain_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Whether the bell should ring, clearing the request.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }

    /// Alert sound for an interval.
    #[must_use]
    pub fn alert_name(&self, index: u32) -> &str {
        self.sounds.alert(SoundChoice::for_interval(index))
    }

    /// Music track for an interval.
    #[must_use]
    pub fn music_name(&self, index: u32) -> &str {
        self.sounds.music(SoundChoice::for_interval(index))
    }

    /// Music playing in the current interval.
    #[must_use]
    pub fn now_playing(&self) -> &str {
        self.sounds.music(self.controller.current_music_choice())
    }

    fn process_events(&mut self) {
        let events: Vec<SessionEvent> = self.events.try_iter().collect();
        for event in events {
            match event {
                SessionEvent::Tick { .. } => self.publish(PublishReason::Tick),
                SessionEvent::IntervalComplete { completed_index } => {
                    self.on_interval_complete(completed_index);
                }
                SessionEvent::SessionComplete { session } => self.on_session_complete(session),
            }
        }
    }

    fn on_interval_complete(&mut self, completed_index: u32) {
        let total = self.controller.total_intervals();
        let mut notice = format!(
            "Interval {} of {} complete  [{}]",
            completed_index + 1,
            total,
            self.alert_name(completed_index)
        );
        if self.controller.phase() == Phase::Running {
            let next = self.controller.current_interval_index();
            notice.push_str(&format!(
                "  next: interval {} with {}",
                next + 1,
                self.music_name(next)
            ));
        }

        if self.notifications.bell {
            self.bell_pending = true;
        }
        self.status = Some(notice.clone());
        self.notices.push(notice);
        self.publish(PublishReason::Lifecycle);
    }

    fn on_session_complete(&mut self, mut session: Session) {
        self.save(&mut session);
        let notice = format!(
            "Session complete: {} intervals of {}s",
            session.completed_intervals, session.interval_seconds
        );
        if self.notifications.completion_summary {
            self.notices.push(notice.clone());
        }
        self.status = Some(notice);
        self.publish(PublishReason::Lifecycle);
    }

    fn save(&self, session: &mut Session) {
        if let Err(e) = self.storage.save(session) {
            warn!(error = %e, "failed to save session");
        }
    }

    fn publish(&mut self, reason: PublishReason) {
        let now = self.now();
        let Some(sync) = self.sync.as_mut() else {
            return;
        };
        if !self.throttle.should_publish(reason, now) {
            return;
        }
        let snapshot = SessionSnapshot::capture(&self.controller, &self.sounds);
        if let Err(e) = sync.publish(&snapshot) {
            warn!(error = %e, "failed to publish snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::features::sync::publisher::MockCompanionSync;
    use crate::storage::Database;
    use chrono::TimeZone;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn storage() -> SessionStorage {
        SessionStorage::with_database(Database::open_in_memory().unwrap())
    }

    fn app_with_sync(
        seconds: u32,
        total: u32,
        sync: Option<Box<dyn CompanionSync>>,
    ) -> (App<ManualClock>, ManualClock) {
        let clock = ManualClock::new(epoch());
        let app = App::new(
            IntervalConfig::new(seconds, total),
            clock.clone(),
            &Config::default(),
            storage(),
            sync,
        );
        (app, clock)
    }

    fn app(seconds: u32, total: u32) -> (App<ManualClock>, ManualClock) {
        app_with_sync(seconds, total, None)
    }

    fn step(app: &mut App<ManualClock>, clock: &ManualClock, seconds: u32) {
        for _ in 0..seconds {
            clock.advance_secs(1);
            app.update();
        }
    }

    #[test]
    fn test_start_saves_active_session() {
        let (mut app, _clock) = app(60, 3);
        app.start().unwrap();

        assert!(app.controller.is_running());
        let active = app.storage.get_active().unwrap().unwrap();
        assert_eq!(active.total_intervals, 3);
        assert_eq!(app.controller.session().and_then(|s| s.id), active.id);
    }

    #[test]
    fn test_update_ticks_each_second() {
        let (mut app, clock) = app(60, 3);
        app.start().unwrap();

        step(&mut app, &clock, 10);
        assert_eq!(app.controller.seconds_remaining(), 50);

        // Two seconds late is still ticked, not reconciled.
        clock.advance_secs(2);
        app.update();
        assert_eq!(app.controller.seconds_remaining(), 48);
    }

    #[test]
    fn test_catch_up_keeps_interval_anchor_on_boundary() {
        let (mut app, clock) = app(2, 3);
        app.start().unwrap();
        let started = clock.now();

        clock.advance(Duration::milliseconds(2900));
        app.update();

        assert_eq!(app.controller.current_interval_index(), 1);
        assert_eq!(
            app.controller.interval_started_at(),
            Some(started + Duration::seconds(2))
        );
    }

    #[test]
    fn test_rollover_rings_bell_and_notices() {
        let (mut app, clock) = app(5, 3);
        app.start().unwrap();

        step(&mut app, &clock, 5);

        assert!(app.take_bell());
        assert!(!app.take_bell());
        let notices = app.drain_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].starts_with("Interval 1 of 3 complete  [chime]"));
        assert!(notices[0].contains("next: interval 2 with ambient-b"));
    }

    #[test]
    fn test_large_gap_reconciles() {
        let (mut app, clock) = app(60, 10);
        app.start().unwrap();
        step(&mut app, &clock, 5);

        clock.advance_secs(2 * 60 + 10);
        app.update();

        assert_eq!(app.controller.current_interval_index(), 2);
        assert_eq!(app.controller.seconds_remaining(), 45);
        assert_eq!(app.drain_notices().len(), 1);
    }

    #[test]
    fn test_session_completion_is_saved() {
        let (mut app, clock) = app(2, 2);
        app.start().unwrap();

        step(&mut app, &clock, 4);

        assert_eq!(app.controller.phase(), Phase::Completed);
        assert!(app.storage.get_active().unwrap().is_none());
        let saved = app.storage.get_recent(1).unwrap().remove(0);
        assert!(saved.is_completed);
        assert_eq!(saved.completed_intervals, 2);

        let notices = app.drain_notices();
        assert_eq!(notices.last().unwrap(), "Session complete: 2 intervals of 2s");
    }

    #[test]
    fn test_pause_excludes_paused_time() {
        let (mut app, clock) = app(60, 3);
        app.start().unwrap();
        step(&mut app, &clock, 10);

        app.toggle_pause().unwrap();
        assert_eq!(app.controller.phase(), Phase::Paused);
        clock.advance_secs(600);
        app.update();
        assert_eq!(app.controller.seconds_remaining(), 50);

        app.toggle_pause().unwrap();
        step(&mut app, &clock, 1);
        assert_eq!(app.controller.seconds_remaining(), 49);
        assert_eq!(app.controller.current_interval_index(), 0);
    }

    #[test]
    fn test_quit_saves_stopped_session() {
        let (mut app, clock) = app(5, 4);
        app.start().unwrap();
        step(&mut app, &clock, 12);

        let session = app.quit().unwrap();

        assert!(app.should_quit);
        assert_eq!(session.completed_intervals, 2);
        assert!(!session.is_completed);
        let saved = app.storage.get(session.id.unwrap()).unwrap().unwrap();
        assert_eq!(saved.ended_at, Some(clock.now()));
    }

    #[test]
    fn test_toggle_when_idle_starts_session() {
        let (mut app, _clock) = app(5, 4);
        app.toggle_pause().unwrap();
        assert!(app.controller.is_running());
    }

    #[test]
    fn test_snapshots_published_on_lifecycle_and_throttled_ticks() {
        let mut sync = MockCompanionSync::new();
        // start, tick at +15s, rollover at +20s
        sync.expect_publish().times(3).returning(|_| Ok(()));
        let (mut app, clock) = app_with_sync(20, 2, Some(Box::new(sync)));

        app.start().unwrap();
        step(&mut app, &clock, 20);
    }

    #[test]
    fn test_publish_failure_does_not_stop_session() {
        let mut sync = MockCompanionSync::new();
        sync.expect_publish()
            .returning(|_| Err(AlarmError::Io(std::io::Error::other("disk full"))));
        let (mut app, clock) = app_with_sync(3, 2, Some(Box::new(sync)));

        app.start().unwrap();
        step(&mut app, &clock, 6);
        assert_eq!(app.controller.phase(), Phase::Completed);
    }
}
