//! Display helpers: countdown formatting, duration parsing, progress bars.

use chrono::Duration;
use once_cell::sync::Lazy;
use regex::Regex;

static DURATION_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*([hms])")
        .unwrap_or_else(|e| panic!("Invalid duration regex: {e}"))
});

static DURATION_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+\s*[hms]\s*)+$")
        .unwrap_or_else(|e| panic!("Invalid duration shape regex: {e}"))
});

/// Format a countdown as `mm:ss`.
///
/// Minutes are not wrapped into hours, so a 90-minute countdown reads `90:00`.
#[must_use]
pub fn format_mmss(seconds: u32) -> String {
    let minutes = seconds / 60;
    let seconds = seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Spell out a duration for summaries, e.g. `1 hour, 5 minutes`.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total_minutes = d.num_minutes();
    if total_minutes < 1 {
        return plural(d.num_seconds(), "second");
    }

    let (hours, minutes) = (total_minutes / 60, total_minutes % 60);
    match (hours, minutes) {
        (0, m) => plural(m, "minute"),
        (h, 0) => plural(h, "hour"),
        (h, m) => format!("{}, {}", plural(h, "hour"), plural(m, "minute")),
    }
}

/// Parse a duration string like `3m`, `90s`, `1m30s`.
///
/// A bare number is read as seconds, since intervals are configured in
/// seconds.
#[must_use]
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();

    if let Ok(seconds) = s.parse::<i64>() {
        return (seconds > 0).then(|| Duration::try_seconds(seconds)).flatten();
    }

    if !DURATION_SHAPE.is_match(&s) {
        return None;
    }

    let mut total_seconds: i64 = 0;
    for caps in DURATION_PART.captures_iter(&s) {
        let num: i64 = caps[1].parse().ok()?;
        let unit = match &caps[2] {
            "h" => 3600,
            "m" => 60,
            _ => 1,
        };
        total_seconds = total_seconds.checked_add(num.checked_mul(unit)?)?;
    }

    (total_seconds > 0)
        .then(|| Duration::try_seconds(total_seconds))
        .flatten()
}

/// Render a progress bar for a fraction in `[0, 1]`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    let empty = width - filled;

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
