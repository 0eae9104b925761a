//! UI rendering for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use crate::core::{Clock, Phase};
use crate::tui::app::App;

const KEY_HELP: &str = "space:pause/resume | s:stop | q:quit | ?:help";

/// Render the application UI.
pub fn render<C: Clock>(frame: &mut Frame<'_>, app: &App<C>) {
    // Header, countdown, interval gauge, session gauge, now playing, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_countdown(frame, app, chunks[1]);
    render_gauges(frame, app, chunks[2], chunks[3]);
    render_now_playing(frame, app, chunks[4]);
    render_status_bar(frame, app, chunks[5]);

    if app.show_help {
        render_help(frame);
    }
}

fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Idle => Color::White,
        Phase::Running => Color::Cyan,
        Phase::Paused => Color::Yellow,
        Phase::Completed => Color::Green,
    }
}

fn render_header<C: Clock>(frame: &mut Frame<'_>, app: &App<C>, area: Rect) {
    let ctrl = &app.controller;
    let title = format!(" {} ", ctrl.status_label());
    let color = phase_color(ctrl.phase());

    let header = Paragraph::new(title)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(" interval-alarm "),
        );

    frame.render_widget(header, area);
}

fn render_countdown<C: Clock>(frame: &mut Frame<'_>, app: &App<C>, area: Rect) {
    let ctrl = &app.controller;
    let mut style = Style::default()
        .fg(phase_color(ctrl.phase()))
        .add_modifier(Modifier::BOLD);
    if ctrl.phase() == Phase::Paused {
        style = style.add_modifier(Modifier::SLOW_BLINK);
    }

    // Vertically center the single countdown line.
    let padding = area.height.saturating_sub(1) / 2;
    let mut lines: Vec<Line<'_>> = (0..padding).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(ctrl.time_remaining_display(), style)));

    let countdown = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(countdown, area);
}

fn render_gauges<C: Clock>(frame: &mut Frame<'_>, app: &App<C>, interval: Rect, session: Rect) {
    let ctrl = &app.controller;

    let interval_gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Interval "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ctrl.interval_progress_fraction().clamp(0.0, 1.0))
        .label(ctrl.time_remaining_display());
    frame.render_widget(interval_gauge, interval);

    let done = ctrl.current_interval_index().min(ctrl.total_intervals());
    let session_gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Session "))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ctrl.progress_fraction().clamp(0.0, 1.0))
        .label(format!("{done}/{}", ctrl.total_intervals()));
    frame.render_widget(session_gauge, session);
}

fn render_now_playing<C: Clock>(frame: &mut Frame<'_>, app: &App<C>, area: Rect) {
    let ctrl = &app.controller;
    let index = ctrl.current_interval_index();

    let line = if matches!(ctrl.phase(), Phase::Running | Phase::Paused) {
        Line::from(vec![
            Span::styled("music ", Style::default().fg(Color::DarkGray)),
            Span::styled(app.now_playing(), Style::default().fg(Color::Magenta)),
            Span::styled("   alert ", Style::default().fg(Color::DarkGray)),
            Span::styled(app.alert_name(index), Style::default().fg(Color::Blue)),
            Span::styled(
                format!("   ({})", ctrl.current_alert_choice()),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else {
        Line::from(Span::styled(
            "Nothing playing",
            Style::default().fg(Color::DarkGray),
        ))
    };

    let now_playing = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Now playing "),
    );
    frame.render_widget(now_playing, area);
}

fn render_status_bar<C: Clock>(frame: &mut Frame<'_>, app: &App<C>, area: Rect) {
    let status_text = app.status.as_deref().unwrap_or(KEY_HELP);
    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, area);
}

fn render_help(frame: &mut Frame<'_>) {
    let area = centered_rect(50, 9, frame.area());
    let lines = vec![
        Line::from("space   pause / resume / start"),
        Line::from("s       stop and save"),
        Line::from("q       quit (stops and saves)"),
        Line::from("?       toggle this help"),
        Line::from(""),
        Line::from(Span::styled(
            "Sleeping the machine is fine: the countdown catches up.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Keys "),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

/// A `width` x `height` rect centered in `area`, shrunk to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::{IntervalConfig, ManualClock};
    use crate::features::history::SessionStorage;
    use crate::storage::Database;
    use chrono::{TimeZone, Utc};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> App<ManualClock> {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
        let storage = SessionStorage::with_database(Database::open_in_memory().unwrap());
        App::new(IntervalConfig::new(90, 4), clock, &Config::default(), storage, None)
    }

    fn draw(app: &App<ManualClock>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 24)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_render_idle() {
        let screen = draw(&app());
        assert!(screen.contains("Ready"));
        assert!(screen.contains("01:30"));
        assert!(screen.contains("Nothing playing"));
    }

    #[test]
    fn test_render_running() {
        let mut app = app();
        app.start().unwrap();
        let screen = draw(&app);

        assert!(screen.contains("Interval 1 of 4"));
        assert!(screen.contains("ambient-a"));
        assert!(screen.contains("chime"));
        assert!(screen.contains("0/4"));
    }

    #[test]
    fn test_render_help_overlay() {
        let mut app = app();
        app.toggle_help();
        let screen = draw(&app);
        assert!(screen.contains("stop and save"));
    }

    #[test]
    fn test_centered_rect_fits() {
        let area = Rect::new(0, 0, 20, 5);
        let rect = centered_rect(50, 9, area);
        assert_eq!(rect, area);

        let rect = centered_rect(10, 3, Rect::new(0, 0, 20, 5));
        assert_eq!(rect, Rect::new(5, 1, 10, 3));
    }
}
