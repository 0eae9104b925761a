//! Terminal host for interval sessions.
//!
//! Drives the controller once per wall-clock second and renders a live
//! countdown with ratatui and crossterm. Headless mode runs the same loop and
//! prints one line per rollover instead.

mod app;
mod event;
mod ui;

pub use app::{App, RECONCILE_GAP_SECONDS};
pub use event::Action;

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::core::{Clock, Phase, Session};
use crate::error::AlarmError;

/// How long to wait for input before re-checking the clock.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Run a session in the terminal UI.
///
/// Returns the session as it was saved when the user quit.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn to.
pub fn run<C: Clock>(app: &mut App<C>) -> Result<Option<Session>, AlarmError> {
    enable_raw_mode()
        .map_err(|e| AlarmError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| AlarmError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AlarmError::Terminal(format!("Failed to create terminal: {e}")))?;

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

fn run_app<B: Backend + Write, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
) -> Result<Option<Session>, AlarmError> {
    app.start()?;
    let mut last = None;

    while !app.should_quit {
        app.update();
        app.drain_notices();
        if app.take_bell() {
            ring_bell(terminal.backend_mut());
        }

        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| AlarmError::Terminal(format!("Failed to draw: {e}")))?;

        if let Some(action) = event::handle_events(POLL_INTERVAL)? {
            match action {
                Action::Quit => last = app.quit().or(last),
                Action::TogglePause => app.toggle_pause()?,
                Action::Stop => last = app.stop().or(last),
                Action::Help => app.toggle_help(),
            }
        }
    }

    Ok(last)
}

/// Run a session without a UI, writing one line per rollover to `out`.
///
/// Returns when the session completes.
///
/// # Errors
///
/// Returns an error if the session cannot be saved at start or `out` cannot
/// be written.
pub fn run_headless<C: Clock, W: Write>(
    app: &mut App<C>,
    out: &mut W,
) -> Result<Option<Session>, AlarmError> {
    drive_headless(app, out, || std::thread::sleep(POLL_INTERVAL))
}

fn drive_headless<C: Clock, W: Write>(
    app: &mut App<C>,
    out: &mut W,
    mut wait: impl FnMut(),
) -> Result<Option<Session>, AlarmError> {
    app.start()?;
    writeln!(
        out,
        "Started: {} intervals of {}s",
        app.controller.total_intervals(),
        app.controller.interval_seconds()
    )?;

    loop {
        app.update();
        if app.take_bell() {
            write!(out, "\x07")?;
        }
        for notice in app.drain_notices() {
            writeln!(out, "{notice}")?;
        }
        out.flush()?;

        if app.controller.phase() == Phase::Completed {
            return Ok(app.stop());
        }
        wait();
    }
}

fn ring_bell<W: Write>(out: &mut W) {
    write!(out, "\x07").ok();
    out.flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::{IntervalConfig, ManualClock};
    use crate::features::history::SessionStorage;
    use crate::storage::Database;
    use chrono::{TimeZone, Utc};

    fn app(config: &Config, seconds: u32, total: u32) -> (App<ManualClock>, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
        let storage = SessionStorage::with_database(Database::open_in_memory().unwrap());
        let app = App::new(
            IntervalConfig::new(seconds, total),
            clock.clone(),
            config,
            storage,
            None,
        );
        (app, clock)
    }

    #[test]
    fn test_headless_prints_one_line_per_rollover() {
        let mut config = Config::default();
        config.notifications.bell = false;
        let (mut app, clock) = app(&config, 3, 3);

        let mut out = Vec::new();
        let session = drive_headless(&mut app, &mut out, || clock.advance_secs(1))
            .unwrap()
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Started: 3 intervals of 3s");
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("Interval 1 of 3 complete"));
        assert!(lines[3].starts_with("Interval 3 of 3 complete"));
        assert_eq!(lines[4], "Session complete: 3 intervals of 3s");
        assert!(session.is_completed);
        assert!(!text.contains('\x07'));
    }

    #[test]
    fn test_headless_rings_bell() {
        let (mut app, clock) = app(&Config::default(), 2, 1);
        let mut out = Vec::new();
        drive_headless(&mut app, &mut out, || clock.advance_secs(1)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('\x07'));
    }

    #[test]
    fn test_headless_catches_up_after_sleep() {
        let mut config = Config::default();
        config.notifications.bell = false;
        let (mut app, clock) = app(&config, 10, 5);

        let mut out = Vec::new();
        let mut first = true;
        drive_headless(&mut app, &mut out, || {
            // Sleep through most of the session on the first wait.
            if first {
                clock.advance_secs(35);
                first = false;
            } else {
                clock.advance_secs(1);
            }
        })
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let rollovers = text.lines().filter(|l| l.contains(" complete  [")).count();
        // One folded notice for intervals 1-3, then intervals 4 and 5.
        assert_eq!(rollovers, 3);
        assert!(text.contains("Interval 3 of 5 complete"));
    }
}
