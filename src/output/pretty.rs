use colored::{ColoredString, Colorize};

use crate::core::display::{format_duration, format_mmss};
use crate::core::{Session, SessionOutcome};
use crate::features::plan::SessionPlan;

fn outcome_icon(outcome: SessionOutcome) -> ColoredString {
    match outcome {
        SessionOutcome::Active => "[>]".cyan(),
        SessionOutcome::Completed => "[x]".green(),
        SessionOutcome::Stopped => "[-]".yellow(),
    }
}

/// Format a list of sessions as a pretty table
pub fn format_sessions_pretty(sessions: &[Session], title: &str) -> String {
    if sessions.is_empty() {
        return format!("{title} (0 sessions)\n  No sessions");
    }

    let mut output = format!("{} ({} sessions)\n", title, sessions.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for session in sessions {
        let outcome = session.outcome();
        let started = session.started_at_local().format("%Y-%m-%d %H:%M");
        let mut line = format!(
            "{} {}  {}/{} intervals of {}",
            outcome_icon(outcome),
            started.to_string().bold(),
            session.completed_intervals,
            session.total_intervals,
            format_mmss(session.interval_seconds),
        );

        if let Some(duration) = session.duration() {
            line.push_str(&format!("  {}", format_duration(duration).dimmed()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a single session as pretty output
pub fn format_session_pretty(session: &Session) -> String {
    let outcome = session.outcome();
    let mut output = format!("{} Session {}\n", outcome_icon(outcome), outcome.to_string().bold());

    if let Some(id) = session.id {
        output.push_str(&format!("  {}: {}\n", "ID".dimmed(), id));
    }
    output.push_str(&format!(
        "  {}: {}\n",
        "Started".dimmed(),
        session.started_at_local().format("%Y-%m-%d %H:%M:%S")
    ));
    if let Some(ended) = session.ended_at {
        output.push_str(&format!(
            "  {}: {}\n",
            "Ended".dimmed(),
            ended.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S")
        ));
    }
    output.push_str(&format!(
        "  {}: {} of {}\n",
        "Intervals".dimmed(),
        session.completed_intervals,
        session.total_intervals
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Interval length".dimmed(),
        format_mmss(session.interval_seconds)
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Time in intervals".dimmed(),
        format_duration(session.interval_time())
    ));

    output
}

/// Format a session schedule as pretty output
pub fn format_plan_pretty(plan: &SessionPlan) -> String {
    let mut output = format!(
        "Session plan: {} x {} ({})\n",
        plan.total_intervals,
        format_mmss(plan.interval_seconds),
        format_duration(chrono::Duration::seconds(
            i64::try_from(plan.total_seconds).unwrap_or(i64::MAX)
        ))
    );
    output.push_str(&"─".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "{}\n",
        format!("{:>3}  {:>6}  {:<16}  {}", "#", "start", "alert", "music").dimmed()
    ));

    for interval in &plan.intervals {
        output.push_str(&format!(
            "{:>3}  {:>6}  {:<16}  {}\n",
            interval.number,
            interval.start_offset_display(),
            interval.alert,
            interval.music.cyan()
        ));
    }

    output
}
