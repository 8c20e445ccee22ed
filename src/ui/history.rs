use chronotrack::{clock::Clock, format::format_time, session::Session, store::KeyValueStore};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const SPLITS_WIDTH: usize = 48;

/// Render the session history screen
pub fn render_history<C: Clock, S: KeyValueStore>(app: &mut App<C, S>, f: &mut Frame) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Sessions table
            Constraint::Length(1), // Toast
            Constraint::Length(1), // Legend
        ])
        .split(area);

    let archive = app.engine.archive();
    let title_text = match archive.longest() {
        Some(longest) => format!(
            "{} sessions, {} tracked, longest {}",
            archive.len(),
            format_time(archive.total_tracked_ms()),
            format_time(longest.total_time)
        ),
        None => "No sessions yet".to_string(),
    };
    let title = Paragraph::new(title_text)
        .block(Block::default().borders(Borders::ALL).title("History"))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    if archive.is_empty() {
        let no_data = Paragraph::new("Reset a running stopwatch to archive a session.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(no_data, chunks[1]);
    } else {
        let table_height = chunks[1].height.saturating_sub(3) as usize; // borders + header
        let max_scroll = archive.len().saturating_sub(table_height);
        if app.history_scroll > max_scroll {
            app.history_scroll = max_scroll;
        }

        let archive = app.engine.archive();
        let longest_id = archive.longest().map(|s| s.id.as_str());
        let rows: Vec<Row> = archive
            .sessions()
            .iter()
            .skip(app.history_scroll)
            .take(table_height)
            .map(|session| {
                let style = if Some(session.id.as_str()) == longest_id && archive.len() > 1 {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(session.date.clone()),
                    Cell::from(format_time(session.total_time)),
                    Cell::from(session.laps.len().to_string()),
                    Cell::from(splits(session)),
                ])
                .style(style)
            })
            .collect();

        let header = Row::new(vec!["Date", "Total", "Laps", "Splits"]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        let widths = [
            Constraint::Length(19), // Date
            Constraint::Length(12), // Total
            Constraint::Length(5),  // Laps
            Constraint::Min(10),    // Splits
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Sessions"))
            .column_spacing(2);
        f.render_widget(table, chunks[1]);
    }

    if let Some(toast) = &app.toast {
        f.render_widget(super::toast_line(toast), chunks[2]);
    }
    f.render_widget(super::legend(app.state), chunks[3]);
}

/// Lap times joined up to a display width, ellipsized past it
fn splits(session: &Session) -> Line<'static> {
    let mut text = String::new();
    for lap in &session.laps {
        let part = format_time(lap.lap_time);
        let sep = if text.is_empty() { "" } else { " " };
        if text.width() + sep.width() + part.width() > SPLITS_WIDTH {
            text.push_str(" …");
            break;
        }
        text.push_str(sep);
        text.push_str(&part);
    }
    Line::from(Span::styled(
        text,
        Style::default().add_modifier(Modifier::DIM),
    ))
}
