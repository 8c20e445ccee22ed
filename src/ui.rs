pub mod goal;
pub mod history;

use chronotrack::{
    clock::Clock,
    format::{format_delta, format_time},
    laps::LapRank,
    store::KeyValueStore,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Widget},
};

use crate::{App, AppState, Toast, ToastLevel};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl<C: Clock, S: KeyValueStore> Widget for &App<C, S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let engine = &self.engine;
        let elapsed = engine.elapsed_ms();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let header_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let goal_height = if engine.goal_ms().is_some() { 3 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),           // status
                Constraint::Length(1),           // clock
                Constraint::Length(1),           //
                Constraint::Length(goal_height), // goal gauge
                Constraint::Length(1),           // lap summary
                Constraint::Min(0),              // laps
                Constraint::Length(1),           // toast
                Constraint::Length(1),           // legend
            ])
            .split(area);

        let status = if engine.is_running() {
            Span::styled("● RUNNING", green_bold_style)
        } else if engine.can_reset() {
            Span::styled("‖ PAUSED", Style::default().patch(bold_style).fg(Color::Yellow))
        } else {
            Span::styled("READY", dim_style)
        };
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let clock_style = if engine.goal_reached() {
            green_bold_style
        } else {
            bold_style
        };
        Paragraph::new(Span::styled(format_time(elapsed), clock_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        if let Some(goal_ms) = engine.goal_ms() {
            let ratio = engine.goal_progress();
            let label = if engine.goal_reached() {
                format!("goal {} reached", format_time(goal_ms))
            } else {
                format!(
                    "{} / {} ({:.0}%)",
                    format_time(elapsed),
                    format_time(goal_ms),
                    ratio * 100.0
                )
            };
            let color = if engine.goal_reached() {
                Color::Green
            } else {
                Color::Cyan
            };
            Gauge::default()
                .block(Block::default().borders(Borders::ALL).title("Goal"))
                .gauge_style(Style::default().fg(color))
                .ratio(ratio.clamp(0.0, 1.0))
                .label(label)
                .render(chunks[3], buf);
        }

        let summary = engine.lap_summary();
        let summary_line = match (summary.fastest_ms, summary.slowest_ms, summary.mean_ms) {
            (Some(fastest), Some(slowest), Some(mean)) => Line::from(vec![
                Span::styled(format!("{} laps", summary.count), bold_style),
                Span::raw("   best "),
                Span::styled(format_time(fastest), green_bold_style),
                Span::raw("   worst "),
                Span::styled(format_time(slowest), red_bold_style),
                Span::raw("   avg "),
                Span::raw(format_time(mean.round() as u64)),
            ]),
            _ if summary.count > 0 => Line::from(Span::styled(
                format!("{} lap", summary.count),
                bold_style,
            )),
            _ => Line::from(Span::styled("no laps yet", dim_style)),
        };
        Paragraph::new(summary_line)
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        let laps = engine.laps();
        let rows: Vec<Row> = engine
            .laps_recent_first()
            .map(|lap| {
                let style = match engine.lap_rank(lap) {
                    LapRank::Fastest => Style::default().fg(Color::Green),
                    LapRank::Slowest => Style::default().fg(Color::Red),
                    LapRank::Normal => Style::default(),
                };
                // laps are numbered from 1 in recording order
                let delta = (lap.number as usize)
                    .checked_sub(2)
                    .and_then(|prev| laps.get(prev))
                    .map(|prev| format_delta(lap.lap_time, prev.lap_time))
                    .unwrap_or_default();
                Row::new(vec![
                    Cell::from(format!("Lap {}", lap.number)),
                    Cell::from(format_time(lap.lap_time)),
                    Cell::from(Span::styled(delta, dim_style)),
                    Cell::from(format_time(lap.total_time)),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(8),  // Lap
            Constraint::Length(12), // Lap time
            Constraint::Length(13), // Delta
            Constraint::Min(12),    // Total
        ];
        Table::new(rows, widths)
            .header(
                Row::new(vec!["Lap", "Lap time", "Δ prev", "Total"]).style(header_style),
            )
            .block(Block::default().borders(Borders::TOP))
            .column_spacing(2)
            .render(chunks[5], buf);

        if let Some(toast) = &self.toast {
            toast_line(toast).render(chunks[6], buf);
        }

        legend(self.state).render(chunks[7], buf);
    }
}

fn toast_line(toast: &Toast) -> Paragraph<'_> {
    let color = match toast.level {
        ToastLevel::Info => Color::Cyan,
        ToastLevel::Success => Color::Green,
        ToastLevel::Warning => Color::Yellow,
    };
    Paragraph::new(Span::styled(
        toast.message.as_str(),
        Style::default().fg(color).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
}

fn legend(state: AppState) -> Paragraph<'static> {
    let keys: &[(&'static str, &'static str)] = match state {
        AppState::Stopwatch | AppState::GoalEntry => &[
            ("space", "start/stop"),
            ("l", "lap"),
            ("r", "reset"),
            ("g", "goal"),
            ("h", "history"),
            ("q", "quit"),
        ],
        AppState::History => &[
            ("↑/↓", "scroll"),
            ("c", "clear"),
            ("b", "back"),
            ("q", "quit"),
        ],
    };

    let key_style = Style::default()
        .add_modifier(Modifier::BOLD)
        .add_modifier(Modifier::UNDERLINED);
    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (key, action) in keys {
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(
            format!(" {action}  "),
            Style::default().add_modifier(Modifier::DIM),
        ));
    }
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}
