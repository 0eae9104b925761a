//! Run command implementation.

use std::io;

use colored::Colorize;
use tracing::info;

use crate::cli::args::{OutputFormat, RunArgs};
use crate::config::{Config, Paths};
use crate::core::display::format_duration;
use crate::core::{Session, SessionOutcome, SystemClock};
use crate::error::AlarmError;
use crate::features::history::SessionStorage;
use crate::features::sync::{CompanionSync, FileSync};
use crate::output::to_json;
use crate::tui::{self, App};

/// Run an interval session in the terminal.
///
/// # Errors
///
/// Returns an error if the timing overrides are invalid, the database cannot
/// be opened, or the terminal cannot be used.
pub fn run(
    config: &Config,
    paths: &Paths,
    args: &RunArgs,
    format: OutputFormat,
) -> Result<String, AlarmError> {
    let timing = args.timing.resolve(&config.session)?;
    let storage = SessionStorage::open(paths)?;
    let sync: Option<Box<dyn CompanionSync>> = if config.sync.enabled {
        Some(Box::new(FileSync::from_paths(paths)))
    } else {
        None
    };

    info!(
        interval_seconds = timing.interval_seconds(),
        total_intervals = timing.total_intervals(),
        headless = args.headless,
        "starting run"
    );

    let mut app = App::new(timing, SystemClock, config, storage, sync);
    let session = if args.headless {
        tui::run_headless(&mut app, &mut io::stdout().lock())?
    } else {
        tui::run(&mut app)?
    };

    match (session, format) {
        (None, _) => Ok(String::new()),
        (Some(session), OutputFormat::Json) => to_json(&session),
        (Some(session), OutputFormat::Pretty) => Ok(summary(&session)),
    }
}

fn summary(session: &Session) -> String {
    let headline = match session.outcome() {
        SessionOutcome::Completed => "Session complete!".green().to_string(),
        SessionOutcome::Stopped => "Session stopped.".yellow().to_string(),
        SessionOutcome::Active => "Session in progress.".to_string(),
    };

    let mut output = vec![headline];
    output.push(format!(
        "   Intervals: {} of {}",
        session.completed_intervals, session.total_intervals
    ));
    if let Some(duration) = session.duration() {
        output.push(format!("   Duration:  {}", format_duration(duration)));
    }
    output.push(String::new());
    output.push(
        "   Use 'interval-alarm report' to see your week"
            .dimmed()
            .to_string(),
    );
    output.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IntervalConfig;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_summary_completed() {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 3, 0, 0).unwrap();
        let mut session = Session::new(IntervalConfig::default(), start);
        session.completed_intervals = 10;
        session.is_completed = true;
        session.ended_at = Some(start + Duration::minutes(30));

        let text = summary(&session);
        assert!(text.contains("Session complete!"));
        assert!(text.contains("Intervals: 10 of 10"));
        assert!(text.contains("30 minutes"));
    }

    #[test]
    fn test_summary_stopped() {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 3, 0, 0).unwrap();
        let mut session = Session::new(IntervalConfig::default(), start);
        session.completed_intervals = 4;
        session.ended_at = Some(start + Duration::minutes(13));

        let text = summary(&session);
        assert!(text.contains("Session stopped."));
        assert!(text.contains("4 of 10"));
    }
}
